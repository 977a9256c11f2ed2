//! Pagekit: object-repository locators and polling waits for UI tests
//!
//! Page objects name their elements symbolically; an XML object repository
//! per page maps each name to a locator per platform (iOS, Android, web).
//! Pagekit resolves those names, substitutes runtime values into locator
//! templates, compiles them to driver-native locators and waits for
//! elements with fixed-interval polling.
//!
//! # Architecture
//!
//! ```text
//! ObjectRepository ──resolve──► LocatorSpec ──substitute/compile──► Locator
//!                                                                      │
//! Page / loader wait ──────────────► Waiter ◄──────────────────────────┘
//!                                      │ find, displayed, enabled
//!                                      ▼
//!                           Driver (WebDriver, Appium, mock)
//! ```

#![warn(missing_docs)]

mod config;
pub mod driver;
mod loader;
mod locator;
mod page_object;
mod platform;
mod repository;
mod result;
mod substitution;
mod wait;

pub use config::{FrameworkConfig, ENV_PREFIX};
pub use driver::{Driver, ElementHandle};
pub use loader::{
    wait_for_all_loaders_gone, GroupReport, GroupStatus, ImplicitWaitGuard, LoaderGroup,
    LoaderReport,
};
pub use locator::{compile, By, Locator, LocatorSpec, LocatorType};
pub use page_object::{ElementRef, Page, PageObject, SessionContext};
pub use platform::Platform;
pub use repository::{ElementDescriptor, LocatorEntry, ObjectRepository};
pub use result::{DriverError, PagekitError, PagekitResult};
pub use substitution::{find_placeholder, substitute, SubstitutionMap};
pub use wait::{
    SetScan, WaitCondition, WaitSpec, Waiter, DEFAULT_ELEMENT_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL_MS,
};

/// Prelude for page-object authors
pub mod prelude {
    pub use crate::driver::{Driver, ElementHandle};
    pub use crate::{
        ElementRef, FrameworkConfig, LoaderGroup, Locator, Page, PageObject, PagekitError,
        PagekitResult, Platform, SessionContext, SubstitutionMap,
    };
}
