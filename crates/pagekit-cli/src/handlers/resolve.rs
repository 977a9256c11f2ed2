//! Resolve command handler

use std::path::{Path, PathBuf};

use pagekit::{
    find_placeholder, substitute, LocatorType, ObjectRepository, PagekitError, Platform,
    SubstitutionMap,
};
use serde::Serialize;

use crate::commands::{FormatArg, ResolveArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;

/// A compiled locator as printed by `resolve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocator {
    /// Element name
    pub element: String,
    /// Platform resolved for
    pub platform: Platform,
    /// Locator strategy
    pub strategy: LocatorType,
    /// Locator value after substitution
    pub value: String,
}

/// Use `file` as given when it exists, otherwise look it up in the
/// configured repository directory for `platform`
#[must_use]
pub fn locate_file(config: &CliConfig, file: &Path, platform: Platform) -> PathBuf {
    if file.exists() {
        return file.to_path_buf();
    }
    let candidate = config.framework.repository_dir(platform).join(file);
    tracing::debug!(
        given = %file.display(),
        candidate = %candidate.display(),
        "repository file not found as given, using configured directory"
    );
    candidate
}

/// Resolve `name`, apply `tokens` and compile
pub fn resolve_element(
    repo: &ObjectRepository,
    name: &str,
    platform: Platform,
    tokens: &SubstitutionMap,
    strict: bool,
) -> CliResult<ResolvedLocator> {
    let spec = substitute(&repo.resolve(name, platform)?, tokens);
    if strict {
        if let Some(placeholder) = find_placeholder(&spec.value) {
            return Err(PagekitError::UnresolvedPlaceholder {
                name: name.to_string(),
                placeholder: placeholder.to_string(),
                platform,
                path: repo.path().to_path_buf(),
            }
            .into());
        }
    }
    let locator = spec.compile();
    Ok(ResolvedLocator {
        element: locator.element().to_string(),
        platform,
        strategy: locator.by().strategy(),
        value: locator.by().value().to_string(),
    })
}

/// Execute the resolve command
pub fn execute_resolve(config: &CliConfig, args: &ResolveArgs, reporter: &Reporter) -> CliResult<()> {
    let platform: Platform = args.platform.into();
    let path = locate_file(config, &args.file, platform);
    let repo = ObjectRepository::load(&path, platform)?;
    let tokens: SubstitutionMap = args.set.iter().cloned().collect();

    let resolved = resolve_element(
        &repo,
        &args.name,
        platform,
        &tokens,
        config.framework.strict_placeholders,
    )?;

    match args.format {
        FormatArg::Json => reporter.line(&serde_json::to_string_pretty(&resolved)?),
        FormatArg::Text => reporter.line(&format!("{}={}", resolved.strategy, resolved.value)),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CliError;

    const PAGE: &str = r#"<objects>
        <object name="lblCountry">
            <web locatorType="xpath" locatorValue="//*[@id='$$countryName$$']"/>
        </object>
    </objects>"#;

    fn repo() -> ObjectRepository {
        ObjectRepository::parse(PAGE, "Page.xml", Platform::Web).unwrap()
    }

    #[test]
    fn test_resolve_with_tokens() {
        let tokens = SubstitutionMap::from([("$$countryName$$", "USA")]);
        let resolved = resolve_element(&repo(), "lblCountry", Platform::Web, &tokens, true).unwrap();
        assert_eq!(resolved.strategy, LocatorType::Xpath);
        assert_eq!(resolved.value, "//*[@id='USA']");
    }

    #[test]
    fn test_strict_rejects_leftover_placeholder() {
        let err = resolve_element(&repo(), "lblCountry", Platform::Web, &SubstitutionMap::new(), true)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Pagekit(PagekitError::UnresolvedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_lenient_keeps_placeholder() {
        let resolved =
            resolve_element(&repo(), "lblCountry", Platform::Web, &SubstitutionMap::new(), false)
                .unwrap();
        assert!(resolved.value.contains("$$countryName$$"));
    }

    #[test]
    fn test_json_shape() {
        let resolved = ResolvedLocator {
            element: "Email".to_string(),
            platform: Platform::Web,
            strategy: LocatorType::Id,
            value: "email".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["platform"], "web");
        assert_eq!(json["strategy"], "id");
        assert_eq!(json["value"], "email");
    }

    #[test]
    fn test_locate_file_falls_back_to_config_dir() {
        let config = CliConfig::new();
        let path = locate_file(&config, Path::new("LoginScreen.xml"), Platform::Android);
        assert_eq!(
            path,
            PathBuf::from("resources/page_objects/mobile/LoginScreen.xml")
        );
    }
}
