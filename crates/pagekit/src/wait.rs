//! Wait/poll engine.
//!
//! Every wait polls the driver at a fixed interval until its condition
//! holds or the timeout elapses. There is no backoff: with a constant
//! interval, a condition that becomes true is detected within one poll,
//! and a condition that never does fails no earlier than the timeout and
//! no later than the timeout plus one probe.
//!
//! Stale-element errors are treated as "not yet" and polling continues.
//! Any other driver error aborts the wait immediately.

use std::time::{Duration, Instant};

use crate::driver::{Driver, ElementHandle};
use crate::locator::Locator;
use crate::result::{DriverError, PagekitError, PagekitResult};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default timeout for element waits (30 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// WAIT CONDITION
// =============================================================================

/// What a wait is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitCondition {
    /// At least one match in the document
    Present,
    /// First match is displayed
    Visible,
    /// First match is displayed and enabled
    Clickable,
    /// No match of any locator in the set is displayed
    InvisibleOfSet,
}

impl WaitCondition {
    /// Short name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::InvisibleOfSet => "invisible-of-set",
        }
    }

    /// The timeout error this condition raises for `locator`
    #[must_use]
    pub fn timeout_error(self, locator: &Locator, timeout: Duration) -> PagekitError {
        let element = locator.element().to_string();
        let origin = locator.origin();
        let locator = locator.by().to_string();
        match self {
            Self::Present => PagekitError::ElementNotFound {
                element,
                locator,
                origin,
                timeout,
            },
            Self::Visible => PagekitError::ElementNotVisible {
                element,
                locator,
                origin,
                timeout,
            },
            Self::Clickable => PagekitError::ElementNotClickable {
                element,
                locator,
                origin,
                timeout,
            },
            Self::InvisibleOfSet => PagekitError::ElementStillVisible {
                element,
                locator,
                origin,
                timeout,
            },
        }
    }
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WAIT SPEC
// =============================================================================

/// One wait invocation: target, condition and timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSpec {
    /// Target locator
    pub locator: Locator,
    /// Condition to satisfy
    pub condition: WaitCondition,
    /// Total wall-clock budget
    pub timeout: Duration,
    /// Pause between probes
    pub poll_interval: Duration,
}

impl WaitSpec {
    /// Create a spec with the default poll interval
    #[must_use]
    pub fn new(locator: Locator, condition: WaitCondition, timeout: Duration) -> Self {
        Self {
            locator,
            condition,
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The error raised when this wait times out
    #[must_use]
    pub fn timeout_error(&self) -> PagekitError {
        self.condition.timeout_error(&self.locator, self.timeout)
    }
}

// =============================================================================
// SET SCAN
// =============================================================================

/// Snapshot of a locator set, used by invisibility waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScan<'l> {
    /// Elements matched across every locator
    pub matched: usize,
    /// First locator with a displayed match
    pub visible: Option<&'l Locator>,
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls one driver session.
#[derive(Debug)]
pub struct Waiter<'d, D: Driver> {
    driver: &'d D,
    poll_interval: Duration,
}

impl<D: Driver> Clone for Waiter<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Driver> Copy for Waiter<'_, D> {}

impl<'d, D: Driver> Waiter<'d, D> {
    /// Create a waiter with the default poll interval
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self {
            driver,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the poll interval; zero is clamped to one millisecond
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// The session being polled
    #[must_use]
    pub const fn driver(&self) -> &'d D {
        self.driver
    }

    /// Pause between probes
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Build a spec for `locator` using this waiter's interval
    #[must_use]
    pub fn spec(&self, locator: &Locator, condition: WaitCondition, timeout: Duration) -> WaitSpec {
        WaitSpec::new(locator.clone(), condition, timeout).with_poll_interval(self.poll_interval)
    }

    /// Wait until at least one element matches
    pub fn wait_for_present(&self, locator: &Locator, timeout: Duration) -> PagekitResult<D::Element> {
        let spec = self.spec(locator, WaitCondition::Present, timeout);
        self.poll(&spec, timeout, || self.driver.find_element(locator.by()))?
            .ok_or_else(|| spec.timeout_error())
    }

    /// Wait until at least one element matches, returning every match
    pub fn wait_for_all_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> PagekitResult<Vec<D::Element>> {
        let spec = self.spec(locator, WaitCondition::Present, timeout);
        self.poll(&spec, timeout, || {
            let found = self.driver.find_elements(locator.by())?;
            Ok((!found.is_empty()).then_some(found))
        })?
        .ok_or_else(|| spec.timeout_error())
    }

    /// Wait until the first match is displayed
    pub fn wait_for_visible(&self, locator: &Locator, timeout: Duration) -> PagekitResult<D::Element> {
        let spec = self.spec(locator, WaitCondition::Visible, timeout);
        self.poll(&spec, timeout, || self.probe_visible(locator))?
            .ok_or_else(|| spec.timeout_error())
    }

    /// Wait until the first match is displayed, then until that element is
    /// also enabled. Both phases share one timeout.
    pub fn wait_for_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> PagekitResult<D::Element> {
        let start = Instant::now();
        let spec = self.spec(locator, WaitCondition::Clickable, timeout);

        let mut current = match self.wait_for_visible(locator, timeout) {
            Ok(element) => element,
            Err(PagekitError::ElementNotVisible { .. }) => return Err(spec.timeout_error()),
            Err(e) => return Err(e),
        };

        let remaining = timeout.saturating_sub(start.elapsed());
        self.poll(&spec, remaining, || {
            let ready = current.is_displayed().and_then(|shown| {
                if shown {
                    current.is_enabled()
                } else {
                    Ok(false)
                }
            });
            match ready {
                Ok(true) => Ok(Some(current.clone())),
                Ok(false) => Ok(None),
                Err(e) if e.is_transient() => {
                    // element was re-rendered, follow the new node
                    if let Some(fresh) = self.driver.find_element(locator.by())? {
                        current = fresh;
                    }
                    Err(e)
                }
                Err(e) => Err(e),
            }
        })?
        .ok_or_else(|| spec.timeout_error())
    }

    /// Poll like [`wait_for_visible`](Self::wait_for_visible) but answer
    /// `false` instead of failing, whatever the reason
    #[must_use]
    pub fn is_displayed(&self, locator: &Locator, timeout: Duration) -> bool {
        match self.wait_for_visible(locator, timeout) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(element = locator.element(), error = %e, "element not displayed");
                false
            }
        }
    }

    /// Wait until no element matched by any locator in `locators` is displayed
    pub fn wait_for_invisible(&self, locators: &[Locator], timeout: Duration) -> PagekitResult<()> {
        let Some(first) = locators.first() else {
            return Ok(());
        };
        let mut last_visible = first;
        let spec = self.spec(first, WaitCondition::InvisibleOfSet, timeout);

        let settled = self.poll(&spec, timeout, || {
            let scan = self.scan_set(locators)?;
            Ok(match scan.visible {
                Some(locator) => {
                    last_visible = locator;
                    None
                }
                None => Some(()),
            })
        })?;

        settled.ok_or_else(|| WaitCondition::InvisibleOfSet.timeout_error(last_visible, timeout))
    }

    /// Query once, without waiting
    pub fn find_all(&self, locator: &Locator) -> PagekitResult<Vec<D::Element>> {
        Ok(self.driver.find_elements(locator.by())?)
    }

    /// Count matches across `locators` and find the first one still displayed.
    ///
    /// A match that goes stale while being checked has left the document and
    /// counts as not displayed.
    pub fn scan_set<'l>(&self, locators: &'l [Locator]) -> Result<SetScan<'l>, DriverError> {
        let mut matched = 0;
        for locator in locators {
            let elements = self.driver.find_elements(locator.by())?;
            matched += elements.len();
            for element in &elements {
                match element.is_displayed() {
                    Ok(true) => {
                        return Ok(SetScan {
                            matched,
                            visible: Some(locator),
                        })
                    }
                    Ok(false) => {}
                    Err(e) if e.is_transient() => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(SetScan {
            matched,
            visible: None,
        })
    }

    /// Probe until `probe` yields a value or `budget` runs out.
    ///
    /// The probe always runs at least once. `Ok(None)` means the budget ran
    /// out; transient driver errors count as an unsatisfied probe.
    pub fn poll<T>(
        &self,
        spec: &WaitSpec,
        budget: Duration,
        mut probe: impl FnMut() -> Result<Option<T>, DriverError>,
    ) -> PagekitResult<Option<T>> {
        let start = Instant::now();
        let mut polls: u32 = 0;
        tracing::debug!(
            element = spec.locator.element(),
            condition = %spec.condition,
            ?budget,
            "wait started"
        );

        loop {
            polls += 1;
            match probe() {
                Ok(Some(value)) => {
                    tracing::debug!(
                        element = spec.locator.element(),
                        condition = %spec.condition,
                        polls,
                        elapsed = ?start.elapsed(),
                        "wait satisfied"
                    );
                    return Ok(Some(value));
                }
                Ok(None) => {
                    tracing::trace!(element = spec.locator.element(), polls, "condition not met");
                }
                Err(e) if e.is_transient() => {
                    tracing::trace!(element = spec.locator.element(), polls, error = %e, "transient driver error");
                }
                Err(e) => return Err(e.into()),
            }

            let elapsed = start.elapsed();
            if elapsed >= budget {
                tracing::debug!(
                    element = spec.locator.element(),
                    condition = %spec.condition,
                    polls,
                    ?elapsed,
                    "wait timed out"
                );
                return Ok(None);
            }
            std::thread::sleep(spec.poll_interval.min(budget - elapsed));
        }
    }

    fn probe_visible(&self, locator: &Locator) -> Result<Option<D::Element>, DriverError> {
        let Some(element) = self.driver.find_element(locator.by())? else {
            return Ok(None);
        };
        Ok(element.is_displayed()?.then_some(element))
    }
}
