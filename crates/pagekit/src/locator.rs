//! Locator strategies and compiled locators.
//!
//! A repository entry resolves to a [`LocatorSpec`]: a recognized
//! [`LocatorType`] plus the raw value for one platform. Compiling a spec
//! yields a [`Locator`], the driver-ready [`By`] together with the symbolic
//! element name used in error messages.
//!
//! Locators are rebuilt on every resolution because substitution values
//! vary per call; nothing here is cached.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::platform::Platform;
use crate::result::{PagekitError, PagekitResult};

// =============================================================================
// LOCATOR TYPE
// =============================================================================

/// The eight locator strategies an object repository may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocatorType {
    /// XPath expression
    Xpath,
    /// DOM `id` / accessibility id
    Id,
    /// `name` attribute
    Name,
    /// Class name
    ClassName,
    /// CSS selector
    Css,
    /// Exact anchor text
    LinkText,
    /// Substring of anchor text
    PartialLinkText,
    /// Tag name
    TagName,
}

impl LocatorType {
    /// All strategies
    pub const ALL: [Self; 8] = [
        Self::Xpath,
        Self::Id,
        Self::Name,
        Self::ClassName,
        Self::Css,
        Self::LinkText,
        Self::PartialLinkText,
        Self::TagName,
    ];

    /// Canonical spelling, as written in repository documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xpath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
            Self::ClassName => "className",
            Self::Css => "css",
            Self::LinkText => "linkText",
            Self::PartialLinkText => "partialLinkText",
            Self::TagName => "tagName",
        }
    }

    /// Parse a strategy name, ignoring ASCII case
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let lowered = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_ascii_lowercase() == lowered)
    }
}

impl std::fmt::Display for LocatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unsupported locator type '{s}'"))
    }
}

// =============================================================================
// BY (NATIVE LOCATOR)
// =============================================================================

/// Driver-native locator, one variant per strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value", rename_all = "camelCase")]
pub enum By {
    /// XPath expression
    XPath(String),
    /// Element id
    Id(String),
    /// Name attribute
    Name(String),
    /// Class name
    ClassName(String),
    /// CSS selector
    Css(String),
    /// Exact link text
    LinkText(String),
    /// Partial link text
    PartialLinkText(String),
    /// Tag name
    TagName(String),
}

impl By {
    /// Build the variant for `strategy`
    #[must_use]
    pub fn new(strategy: LocatorType, value: impl Into<String>) -> Self {
        let value = value.into();
        match strategy {
            LocatorType::Xpath => Self::XPath(value),
            LocatorType::Id => Self::Id(value),
            LocatorType::Name => Self::Name(value),
            LocatorType::ClassName => Self::ClassName(value),
            LocatorType::Css => Self::Css(value),
            LocatorType::LinkText => Self::LinkText(value),
            LocatorType::PartialLinkText => Self::PartialLinkText(value),
            LocatorType::TagName => Self::TagName(value),
        }
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::XPath(value.into())
    }

    /// Id locator
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    /// CSS locator
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::Css(value.into())
    }

    /// The strategy this locator uses
    #[must_use]
    pub const fn strategy(&self) -> LocatorType {
        match self {
            Self::XPath(_) => LocatorType::Xpath,
            Self::Id(_) => LocatorType::Id,
            Self::Name(_) => LocatorType::Name,
            Self::ClassName(_) => LocatorType::ClassName,
            Self::Css(_) => LocatorType::Css,
            Self::LinkText(_) => LocatorType::LinkText,
            Self::PartialLinkText(_) => LocatorType::PartialLinkText,
            Self::TagName(_) => LocatorType::TagName,
        }
    }

    /// The raw locator value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::XPath(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::ClassName(v)
            | Self::Css(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v)
            | Self::TagName(v) => v,
        }
    }
}

impl std::fmt::Display for By {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// =============================================================================
// LOCATOR SPEC
// =============================================================================

/// A repository entry resolved for one platform, before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSpec {
    /// Symbolic element name
    pub element: String,
    /// Platform the entry was resolved for
    pub platform: Platform,
    /// Locator strategy
    pub locator_type: LocatorType,
    /// Locator value, possibly containing `$$token$$` placeholders
    pub value: String,
}

impl LocatorSpec {
    /// Create a spec
    #[must_use]
    pub fn new(
        element: impl Into<String>,
        platform: Platform,
        locator_type: LocatorType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            platform,
            locator_type,
            value: value.into(),
        }
    }

    /// Compile into a driver-ready locator
    #[must_use]
    pub fn compile(&self) -> Locator {
        compile(self)
    }
}

/// Convert a resolved spec into its native locator.
///
/// Unrecognized strategies are rejected when the repository entry is
/// resolved, so every [`LocatorType`] here maps to exactly one [`By`].
#[must_use]
pub fn compile(spec: &LocatorSpec) -> Locator {
    Locator {
        element: spec.element.clone(),
        by: By::new(spec.locator_type, spec.value.clone()),
        platform: Some(spec.platform),
        repository: None,
    }
}

// =============================================================================
// COMPILED LOCATOR
// =============================================================================

/// A compiled locator: the native [`By`] plus the name it was resolved from
/// and, when known, the platform and repository file behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    element: String,
    by: By,
    platform: Option<Platform>,
    repository: Option<PathBuf>,
}

impl Locator {
    /// Wrap a native locator under a display name
    #[must_use]
    pub fn new(element: impl Into<String>, by: By) -> Self {
        Self {
            element: element.into(),
            by,
            platform: None,
            repository: None,
        }
    }

    /// Record the repository file this locator was resolved from
    #[must_use]
    pub fn with_repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository = Some(path.into());
        self
    }

    /// Parse a `strategy:value` string, splitting on the first `:`.
    ///
    /// The whole input doubles as the element name.
    pub fn parse(input: &str) -> PagekitResult<Self> {
        let Some((strategy, value)) = input.split_once(':') else {
            return Err(PagekitError::InvalidLocatorString {
                input: input.to_string(),
            });
        };
        let locator_type =
            LocatorType::parse(strategy).ok_or_else(|| PagekitError::UnsupportedLocatorType {
                name: input.to_string(),
                locator_type: strategy.to_string(),
                path: "<inline>".into(),
            })?;
        Ok(Self::new(input, By::new(locator_type, value)))
    }

    /// Symbolic element name
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Native locator
    #[must_use]
    pub const fn by(&self) -> &By {
        &self.by
    }

    /// Platform the entry was resolved for
    #[must_use]
    pub const fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Repository file the entry came from
    #[must_use]
    pub fn repository(&self) -> Option<&Path> {
        self.repository.as_deref()
    }

    /// Platform and repository file, for error messages
    #[must_use]
    pub fn origin(&self) -> String {
        match (self.platform, &self.repository) {
            (Some(platform), Some(path)) => format!("{platform}, {}", path.display()),
            (Some(platform), None) => platform.to_string(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "inline".to_string(),
        }
    }
}

impl From<By> for Locator {
    fn from(by: By) -> Self {
        Self::new(by.to_string(), by)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.element, self.by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod locator_type_tests {
        use super::*;

        #[test]
        fn test_parse_ignores_case() {
            assert_eq!(LocatorType::parse("XPATH"), Some(LocatorType::Xpath));
            assert_eq!(LocatorType::parse("classname"), Some(LocatorType::ClassName));
            assert_eq!(LocatorType::parse("className"), Some(LocatorType::ClassName));
            assert_eq!(
                LocatorType::parse("PartialLinkText"),
                Some(LocatorType::PartialLinkText)
            );
            assert_eq!(LocatorType::parse("tagname"), Some(LocatorType::TagName));
        }

        #[test]
        fn test_parse_rejects_unknown() {
            assert_eq!(LocatorType::parse("accessibilityId"), None);
            assert_eq!(LocatorType::parse(""), None);
            assert!("cssSelector".parse::<LocatorType>().is_err());
        }

        #[test]
        fn test_every_canonical_spelling_parses_back() {
            for t in LocatorType::ALL {
                assert_eq!(LocatorType::parse(t.as_str()), Some(t));
            }
        }
    }

    mod compile_tests {
        use super::*;

        #[test]
        fn test_id_scenario() {
            let spec = LocatorSpec::new("Email", Platform::Web, LocatorType::Id, "email");
            let locator = compile(&spec);
            assert_eq!(locator.by(), &By::id("email"));
            assert_eq!(locator.element(), "Email");
            assert_eq!(locator.platform(), Some(Platform::Web));
            assert_eq!(locator.origin(), "web");
        }

        #[test]
        fn test_origin_names_platform_and_repository() {
            let spec = LocatorSpec::new("Email", Platform::Android, LocatorType::Id, "email");
            let locator = spec.compile().with_repository("pages/LoginPage.xml");
            assert_eq!(locator.repository(), Some(Path::new("pages/LoginPage.xml")));
            assert_eq!(locator.origin(), "android, pages/LoginPage.xml");
            assert_eq!(Locator::from(By::css(".busy")).origin(), "inline");
        }

        #[test]
        fn test_each_strategy_maps_to_its_variant() {
            let cases = [
                (LocatorType::Xpath, By::XPath("v".into())),
                (LocatorType::Id, By::Id("v".into())),
                (LocatorType::Name, By::Name("v".into())),
                (LocatorType::ClassName, By::ClassName("v".into())),
                (LocatorType::Css, By::Css("v".into())),
                (LocatorType::LinkText, By::LinkText("v".into())),
                (LocatorType::PartialLinkText, By::PartialLinkText("v".into())),
                (LocatorType::TagName, By::TagName("v".into())),
            ];
            for (strategy, expected) in cases {
                let spec = LocatorSpec::new("el", Platform::Android, strategy, "v");
                assert_eq!(spec.compile().by(), &expected);
            }
        }

        #[test]
        fn test_display() {
            let locator = Locator::new("btnLogin", By::css("button.primary"));
            assert_eq!(locator.to_string(), "btnLogin (css=button.primary)");
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_splits_on_first_colon() {
            let locator = Locator::parse("xpath://a[@href='http://x']").unwrap();
            assert_eq!(locator.by(), &By::xpath("//a[@href='http://x']"));
        }

        #[test]
        fn test_missing_delimiter() {
            let err = Locator::parse("just-a-value").unwrap_err();
            assert!(matches!(err, PagekitError::InvalidLocatorString { .. }));
        }

        #[test]
        fn test_unknown_strategy() {
            let err = Locator::parse("jquery:#login").unwrap_err();
            match err {
                PagekitError::UnsupportedLocatorType { locator_type, .. } => {
                    assert_eq!(locator_type, "jquery");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_compile_preserves_strategy_and_value(
                index in 0usize..8,
                value in ".*"
            ) {
                let strategy = LocatorType::ALL[index];
                let spec = LocatorSpec::new("el", Platform::Web, strategy, value.clone());
                let locator = spec.compile();
                prop_assert_eq!(locator.by().strategy(), strategy);
                prop_assert_eq!(locator.by().value(), value.as_str());
            }
        }
    }
}
