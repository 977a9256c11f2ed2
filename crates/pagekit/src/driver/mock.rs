//! Scriptable in-memory driver for unit and scenario tests.
//!
//! Elements are registered against a [`By`] and carry time windows,
//! measured from the moment the element was built, that decide when they
//! are in the document, displayed and enabled. That is enough to script
//! "spinner disappears after one second" style scenarios without a browser.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use super::{Driver, ElementHandle};
use crate::locator::By;
use crate::result::DriverError;

/// Half-open activity window relative to element creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    from: Option<Duration>,
    until: Option<Duration>,
}

impl Window {
    const ALWAYS: Self = Self {
        from: Some(Duration::ZERO),
        until: None,
    };
    const NEVER: Self = Self {
        from: None,
        until: None,
    };

    fn contains(self, elapsed: Duration) -> bool {
        self.from.is_some_and(|from| elapsed >= from) && self.until.map_or(true, |u| elapsed < u)
    }
}

/// A fake element whose state changes on a schedule.
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    created: Instant,
    present: Window,
    displayed: Window,
    enabled: Window,
    stale_after: Option<Duration>,
    error: Option<DriverError>,
}

impl MockElement {
    /// Element that is present, displayed and enabled from the start
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: Instant::now(),
            present: Window::ALWAYS,
            displayed: Window::ALWAYS,
            enabled: Window::ALWAYS,
            stale_after: None,
            error: None,
        }
    }

    /// Present but never displayed
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = Window::NEVER;
        self
    }

    /// Displayed once `delay` has passed
    #[must_use]
    pub const fn visible_after(mut self, delay: Duration) -> Self {
        self.displayed.from = Some(delay);
        self
    }

    /// Stops being displayed once `delay` has passed
    #[must_use]
    pub const fn hidden_after(mut self, delay: Duration) -> Self {
        self.displayed.until = Some(delay);
        self
    }

    /// Never enabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = Window::NEVER;
        self
    }

    /// Enabled once `delay` has passed
    #[must_use]
    pub const fn enabled_after(mut self, delay: Duration) -> Self {
        self.enabled.from = Some(delay);
        self
    }

    /// Attached to the document once `delay` has passed
    #[must_use]
    pub const fn present_after(mut self, delay: Duration) -> Self {
        self.present.from = Some(delay);
        self
    }

    /// Removed from the document once `delay` has passed
    #[must_use]
    pub const fn removed_after(mut self, delay: Duration) -> Self {
        self.present.until = Some(delay);
        self
    }

    /// Detached from the document once `delay` has passed; handles held
    /// from before then fail every state query as stale
    #[must_use]
    pub const fn stale_after(mut self, delay: Duration) -> Self {
        self.present.until = Some(delay);
        self.stale_after = Some(delay);
        self
    }

    /// Every state query fails with `error`
    #[must_use]
    pub fn failing(mut self, error: DriverError) -> Self {
        self.error = Some(error);
        self
    }

    /// Identifier given at construction
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn is_present(&self) -> bool {
        self.present.contains(self.created.elapsed())
    }

    fn check(&self, window: Window) -> Result<bool, DriverError> {
        let elapsed = self.created.elapsed();
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.stale_after.is_some_and(|at| elapsed >= at) {
            return Err(DriverError::stale(format!("element '{}' was detached", self.id)));
        }
        Ok(window.contains(elapsed))
    }
}

impl ElementHandle for MockElement {
    fn is_displayed(&self) -> Result<bool, DriverError> {
        self.check(self.displayed)
    }

    fn is_enabled(&self) -> Result<bool, DriverError> {
        self.check(self.enabled)
    }
}

/// In-memory session keyed by locator.
#[derive(Debug, Default)]
pub struct MockDriver {
    elements: RefCell<Vec<(By, MockElement)>>,
    find_failures: RefCell<Vec<(By, DriverError, usize)>>,
    implicit_wait_failures: RefCell<Vec<(Duration, DriverError)>>,
    implicit_waits: RefCell<Vec<Duration>>,
    queries: RefCell<Vec<By>>,
    implicit_wait: Cell<Duration>,
}

impl MockDriver {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element, builder style
    #[must_use]
    pub fn with_element(self, by: By, element: MockElement) -> Self {
        self.add_element(by, element);
        self
    }

    /// Register an element under `by`; several elements may share one locator
    pub fn add_element(&self, by: By, element: MockElement) {
        self.elements.borrow_mut().push((by, element));
    }

    /// Fail the next `times` queries for `by` with `error`
    pub fn fail_find(&self, by: By, error: DriverError, times: usize) {
        self.find_failures.borrow_mut().push((by, error, times));
    }

    /// Fail every attempt to set the implicit wait to `timeout`
    pub fn fail_implicit_wait(&self, timeout: Duration, error: DriverError) {
        self.implicit_wait_failures.borrow_mut().push((timeout, error));
    }

    /// Every implicit-wait value requested, in call order, failed calls included
    #[must_use]
    pub fn implicit_wait_log(&self) -> Vec<Duration> {
        self.implicit_waits.borrow().clone()
    }

    /// Implicit wait currently in effect
    #[must_use]
    pub fn implicit_wait(&self) -> Duration {
        self.implicit_wait.get()
    }

    /// Number of `find_elements` calls made for `by`
    #[must_use]
    pub fn query_count(&self, by: &By) -> usize {
        self.queries.borrow().iter().filter(|q| *q == by).count()
    }
}

impl Driver for MockDriver {
    type Element = MockElement;

    fn find_elements(&self, by: &By) -> Result<Vec<MockElement>, DriverError> {
        self.queries.borrow_mut().push(by.clone());

        let mut failures = self.find_failures.borrow_mut();
        if let Some(slot) = failures.iter_mut().find(|(b, _, n)| b == by && *n > 0) {
            slot.2 -= 1;
            return Err(slot.1.clone());
        }
        drop(failures);

        Ok(self
            .elements
            .borrow()
            .iter()
            .filter(|(b, e)| b == by && e.is_present())
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn set_implicit_wait(&self, timeout: Duration) -> Result<(), DriverError> {
        self.implicit_waits.borrow_mut().push(timeout);
        if let Some((_, error)) = self
            .implicit_wait_failures
            .borrow()
            .iter()
            .find(|(t, _)| *t == timeout)
        {
            return Err(error.clone());
        }
        self.implicit_wait.set(timeout);
        Ok(())
    }
}
