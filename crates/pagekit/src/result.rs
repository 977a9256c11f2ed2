//! Result and error types for pagekit.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::platform::Platform;

/// Result type for pagekit operations
pub type PagekitResult<T> = Result<T, PagekitError>;

/// Errors reported by the underlying browser or device driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The element handle no longer refers to a node in the document
    #[error("stale element reference: {message}")]
    StaleElement {
        /// Error message
        message: String,
    },

    /// The driver rejected the locator expression
    #[error("invalid selector: {message}")]
    InvalidSelector {
        /// Error message
        message: String,
    },

    /// The session is gone or the driver could not answer
    #[error("session error: {message}")]
    Session {
        /// Error message
        message: String,
    },
}

impl DriverError {
    /// Create a stale element error
    #[must_use]
    pub fn stale(message: impl Into<String>) -> Self {
        Self::StaleElement {
            message: message.into(),
        }
    }

    /// Create an invalid selector error
    #[must_use]
    pub fn invalid_selector(message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            message: message.into(),
        }
    }

    /// Create a session error
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Whether a wait loop should keep polling after this error
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }
}

/// Errors that can occur in pagekit
#[derive(Debug, Error)]
pub enum PagekitError {
    /// Repository document could not be read or parsed
    #[error("failed to load object repository {path}: {message}")]
    RepositoryLoad {
        /// Repository file path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Element name was empty or whitespace
    #[error("element name must not be empty (repository {path})")]
    EmptyElementName {
        /// Repository file path
        path: PathBuf,
    },

    /// No `object` entry carries the requested name
    #[error("element '{name}' is not defined in {path}")]
    ElementNotDefined {
        /// Symbolic element name
        name: String,
        /// Repository file path
        path: PathBuf,
    },

    /// Two entries share one name; only the first is ever resolved
    #[error("element '{name}' is defined more than once in {path}")]
    DuplicateElement {
        /// Symbolic element name
        name: String,
        /// Repository file path
        path: PathBuf,
    },

    /// Entry has no child tagged with the requested platform
    #[error("element '{name}' has no '{platform}' locator in {path}")]
    MissingPlatformVariant {
        /// Symbolic element name
        name: String,
        /// Requested platform
        platform: Platform,
        /// Repository file path
        path: PathBuf,
    },

    /// Platform child lacks `locatorType` or `locatorValue`
    #[error("element '{name}' ({platform}) is missing the '{attribute}' attribute in {path}")]
    MalformedLocatorEntry {
        /// Symbolic element name
        name: String,
        /// Requested platform
        platform: Platform,
        /// The absent attribute
        attribute: &'static str,
        /// Repository file path
        path: PathBuf,
    },

    /// `locatorType` is not one of the eight recognized strategies
    #[error("element '{name}' uses unsupported locator type '{locator_type}' ({path})")]
    UnsupportedLocatorType {
        /// Symbolic element name
        name: String,
        /// The offending strategy string
        locator_type: String,
        /// Repository file path
        path: PathBuf,
    },

    /// A `strategy:value` string had no delimiter
    #[error("improper locator string '{input}', expected 'strategy:value'")]
    InvalidLocatorString {
        /// The rejected input
        input: String,
    },

    /// A `$$token$$` placeholder survived substitution (strict mode)
    #[error(
        "element '{name}' ({platform}) still contains placeholder '{placeholder}' after substitution in {path}"
    )]
    UnresolvedPlaceholder {
        /// Symbolic element name
        name: String,
        /// First leftover placeholder
        placeholder: String,
        /// Platform the entry was resolved for
        platform: Platform,
        /// Repository file path
        path: PathBuf,
    },

    /// Nothing matched the locator before the timeout
    #[error("element '{element}' ({locator}) was not found within {timeout:?} [{origin}]")]
    ElementNotFound {
        /// Symbolic element name
        element: String,
        /// Compiled locator
        locator: String,
        /// Platform and repository file the locator came from
        origin: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// A match existed but never became visible
    #[error("element '{element}' ({locator}) was not visible within {timeout:?} [{origin}]")]
    ElementNotVisible {
        /// Symbolic element name
        element: String,
        /// Compiled locator
        locator: String,
        /// Platform and repository file the locator came from
        origin: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// The element stayed disabled or hidden
    #[error("element '{element}' ({locator}) was not clickable within {timeout:?} [{origin}]")]
    ElementNotClickable {
        /// Symbolic element name
        element: String,
        /// Compiled locator
        locator: String,
        /// Platform and repository file the locator came from
        origin: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// At least one match stayed visible
    #[error("element '{element}' ({locator}) was still visible after {timeout:?} [{origin}]")]
    ElementStillVisible {
        /// Symbolic element name
        element: String,
        /// Compiled locator
        locator: String,
        /// Platform and repository file the locator came from
        origin: String,
        /// Timeout that elapsed
        timeout: Duration,
    },

    /// Non-transient driver failure
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Framework configuration is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PagekitError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error comes from a wait timing out rather than from
    /// a repository authoring defect or a driver failure
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::ElementNotVisible { .. }
                | Self::ElementNotClickable { .. }
                | Self::ElementStillVisible { .. }
        )
    }
}
