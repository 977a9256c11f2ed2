//! Driver capability surface.
//!
//! The wait engine talks to a browser or device session only through the
//! two traits here. Adapters for a concrete WebDriver/Appium client live
//! outside this crate; [`mock`] provides a scriptable in-memory session.
//!
//! Both traits take `&self`: a session handle is shared by the page
//! facade, the waiter and the loader guard for the duration of one test,
//! and drivers are expected to handle their own interior mutability.

use std::time::Duration;

use crate::locator::By;
use crate::result::DriverError;

pub mod mock;

/// A matched element in the session.
pub trait ElementHandle {
    /// Whether the element is rendered and not hidden
    fn is_displayed(&self) -> Result<bool, DriverError>;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> Result<bool, DriverError>;
}

/// One browser or device session.
pub trait Driver {
    /// Element handle type returned by queries
    type Element: ElementHandle + Clone;

    /// Every element currently matching `by`, in document order.
    ///
    /// An empty result is not an error.
    fn find_elements(&self, by: &By) -> Result<Vec<Self::Element>, DriverError>;

    /// First element matching `by`, if any
    fn find_element(&self, by: &By) -> Result<Option<Self::Element>, DriverError> {
        Ok(self.find_elements(by)?.into_iter().next())
    }

    /// Set the session's implicit element-lookup timeout
    fn set_implicit_wait(&self, timeout: Duration) -> Result<(), DriverError>;
}
