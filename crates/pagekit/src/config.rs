//! Framework configuration.
//!
//! Loaded from YAML, then overridden by `PAGEKIT_*` environment variables,
//! then validated:
//!
//! ```yaml
//! web_repository_dir: resources/page_objects/web
//! mobile_repository_dir: resources/page_objects/mobile
//! element_timeout_secs: 30
//! implicit_wait_secs: 15
//! loader_timeout_secs: 180
//! poll_interval_ms: 500
//! loader_settle_delay_ms: 500
//! strict_placeholders: false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::result::{PagekitError, PagekitResult};
use crate::wait::{DEFAULT_ELEMENT_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_MS};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PAGEKIT_";

/// Session-wide settings shared by every page object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkConfig {
    /// Repository directory for web pages
    pub web_repository_dir: PathBuf,
    /// Repository directory for iOS and Android screens
    pub mobile_repository_dir: PathBuf,
    /// Default timeout for element waits
    pub element_timeout_secs: u64,
    /// Implicit wait restored after each loader wait
    pub implicit_wait_secs: u64,
    /// Default timeout for the loader wait
    pub loader_timeout_secs: u64,
    /// Pause between driver polls
    pub poll_interval_ms: u64,
    /// Pause before loader checks start
    pub loader_settle_delay_ms: u64,
    /// Fail on placeholders left after substitution
    pub strict_placeholders: bool,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            web_repository_dir: PathBuf::from("resources/page_objects/web"),
            mobile_repository_dir: PathBuf::from("resources/page_objects/mobile"),
            element_timeout_secs: DEFAULT_ELEMENT_TIMEOUT_SECS,
            implicit_wait_secs: 15,
            loader_timeout_secs: 180,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            loader_settle_delay_ms: 500,
            strict_placeholders: false,
        }
    }
}

impl FrameworkConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> PagekitResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| PagekitError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file, apply environment overrides, validate
    pub fn load(path: impl AsRef<Path>) -> PagekitResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PagekitError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_yaml_ng::from_str(&text)
            .map_err(|e| PagekitError::config(format!("invalid YAML in {}: {e}", path.display())))?;
        let config = config.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(path = %path.display(), "loaded framework config");
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> PagekitResult<Self> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `PAGEKIT_<KEY>` overrides from `lookup`, then validate
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> PagekitResult<Self> {
        let var = |key: &str| lookup(&format!("{ENV_PREFIX}{}", key.to_ascii_uppercase()));

        if let Some(v) = var("web_repository_dir") {
            self.web_repository_dir = PathBuf::from(v);
        }
        if let Some(v) = var("mobile_repository_dir") {
            self.mobile_repository_dir = PathBuf::from(v);
        }
        for (key, slot) in [
            ("element_timeout_secs", &mut self.element_timeout_secs),
            ("implicit_wait_secs", &mut self.implicit_wait_secs),
            ("loader_timeout_secs", &mut self.loader_timeout_secs),
            ("poll_interval_ms", &mut self.poll_interval_ms),
            ("loader_settle_delay_ms", &mut self.loader_settle_delay_ms),
        ] {
            if let Some(v) = var(key) {
                *slot = v.trim().parse().map_err(|_| {
                    PagekitError::config(format!(
                        "{ENV_PREFIX}{} must be a non-negative integer, got '{v}'",
                        key.to_ascii_uppercase()
                    ))
                })?;
            }
        }
        if let Some(v) = var("strict_placeholders") {
            self.strict_placeholders = parse_bool(&v).ok_or_else(|| {
                PagekitError::config(format!(
                    "{ENV_PREFIX}STRICT_PLACEHOLDERS must be true or false, got '{v}'"
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> PagekitResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(PagekitError::config("poll_interval_ms must be greater than zero"));
        }
        if self.web_repository_dir.as_os_str().is_empty()
            || self.mobile_repository_dir.as_os_str().is_empty()
        {
            return Err(PagekitError::config("repository directories must not be empty"));
        }
        Ok(())
    }

    /// Repository directory for `platform`
    #[must_use]
    pub fn repository_dir(&self, platform: Platform) -> &Path {
        if platform.is_mobile() {
            &self.mobile_repository_dir
        } else {
            &self.web_repository_dir
        }
    }

    /// Full path of a page's repository file for `platform`
    #[must_use]
    pub fn repository_path(&self, platform: Platform, file_name: &str) -> PathBuf {
        self.repository_dir(platform).join(file_name)
    }

    /// Default element wait
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    /// Session implicit wait
    #[must_use]
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    /// Default loader wait
    #[must_use]
    pub const fn loader_timeout(&self) -> Duration {
        Duration::from_secs(self.loader_timeout_secs)
    }

    /// Poll interval
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Pause before loader checks
    #[must_use]
    pub const fn loader_settle_delay(&self) -> Duration {
        Duration::from_millis(self.loader_settle_delay_ms)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
