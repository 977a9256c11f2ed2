//! Target platform of a session.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The runtime category a locator is written for.
///
/// Each variant's [`tag`](Platform::tag) is the child element name used in
/// object repository documents (`<ios>`, `<android>`, `<web>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Mobile iOS (XCUITest)
    Ios,
    /// Mobile Android (UiAutomator)
    Android,
    /// Desktop or mobile web browser
    Web,
}

impl Platform {
    /// All platforms, in repository declaration order
    pub const ALL: [Self; 3] = [Self::Ios, Self::Android, Self::Web];

    /// Repository tag name for this platform
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    /// Whether repositories for this platform live in the mobile directory
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }

    /// Map a repository tag back to a platform (exact, lowercase)
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown platform '{s}', expected ios, android or web"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Platform::Ios.tag(), "ios");
        assert_eq!(Platform::Android.tag(), "android");
        assert_eq!(Platform::Web.tag(), "web");
    }

    #[test]
    fn test_from_tag_is_exact() {
        assert_eq!(Platform::from_tag("web"), Some(Platform::Web));
        assert_eq!(Platform::from_tag("Web"), None);
        assert_eq!(Platform::from_tag("desktop"), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ANDROID".parse::<Platform>(), Ok(Platform::Android));
        assert_eq!(" iOS ".parse::<Platform>(), Ok(Platform::Ios));
        assert!("symbian".parse::<Platform>().is_err());
    }

    #[test]
    fn test_mobile_category() {
        assert!(Platform::Ios.is_mobile());
        assert!(Platform::Android.is_mobile());
        assert!(!Platform::Web.is_mobile());
    }

    #[test]
    fn test_serde_lowercase() {
        let yaml = serde_yaml_ng::to_string(&Platform::Android).unwrap();
        assert_eq!(yaml.trim(), "android");
        let back: Platform = serde_yaml_ng::from_str("ios").unwrap();
        assert_eq!(back, Platform::Ios);
    }
}
