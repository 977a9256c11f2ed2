//! Loader-invisibility composite wait.
//!
//! Applications show several independent busy indicators (grid spinners,
//! full-page overlays, inline spinners). A page is settled once no group
//! has a displayed match. The wait is best-effort: a group that never
//! clears is logged and reported, never raised.

use std::time::{Duration, Instant};

use crate::driver::Driver;
use crate::locator::{By, Locator};
use crate::wait::{WaitCondition, Waiter};

// =============================================================================
// LOADER GROUP
// =============================================================================

/// A named family of busy indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderGroup {
    name: String,
    locators: Vec<Locator>,
}

impl LoaderGroup {
    /// Create a group from native locators
    #[must_use]
    pub fn new(name: impl Into<String>, locators: impl IntoIterator<Item = By>) -> Self {
        let name = name.into();
        let locators = locators
            .into_iter()
            .map(|by| Locator::new(name.clone(), by))
            .collect();
        Self { name, locators }
    }

    /// Create a group from XPath expressions
    #[must_use]
    pub fn xpaths<S: Into<String>>(name: impl Into<String>, xpaths: impl IntoIterator<Item = S>) -> Self {
        Self::new(name, xpaths.into_iter().map(By::xpath))
    }

    /// Group name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locators in this group
    #[must_use]
    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Grid and layout spinners
    #[must_use]
    pub fn circle() -> Self {
        Self::xpaths(
            "circle",
            [
                "//div[@class='jqx-grid-load']",
                "//div[@id='layoutSpinner']",
                "//div[@class='dp-spinner']",
            ],
        )
    }

    /// Full-page blocking overlays
    #[must_use]
    pub fn stripes() -> Self {
        Self::xpaths(
            "stripes",
            [
                "//div[@class='blockUI blockOverlay'] | (//div[@id='skn-blocker']/img)[1]",
                "//div[@id='blocker']",
                "//div[@class='skn-blocker']//img",
            ],
        )
    }

    /// Inline font-icon spinner
    #[must_use]
    pub fn spinner() -> Self {
        Self::xpaths("spinner", ["//i[@class='fa-li fa fa-spinner fa-spin']"])
    }

    /// circle, stripes and spinner, in that order
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::circle(), Self::stripes(), Self::spinner()]
    }
}

// =============================================================================
// IMPLICIT WAIT GUARD
// =============================================================================

/// Zeroes the session's implicit wait and restores it on drop.
///
/// Restoration runs on every exit path, unwinding included.
#[derive(Debug)]
pub struct ImplicitWaitGuard<'d, D: Driver> {
    driver: &'d D,
    restore_to: Duration,
}

impl<'d, D: Driver> ImplicitWaitGuard<'d, D> {
    /// Set the implicit wait to zero until the guard drops
    pub fn zero(driver: &'d D, restore_to: Duration) -> Self {
        if let Err(e) = driver.set_implicit_wait(Duration::ZERO) {
            tracing::warn!(error = %e, "failed to clear implicit wait, polling with it in place");
        }
        Self { driver, restore_to }
    }
}

impl<D: Driver> Drop for ImplicitWaitGuard<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.driver.set_implicit_wait(self.restore_to) {
            tracing::warn!(
                error = %e,
                restore_to = ?self.restore_to,
                "failed to restore implicit wait"
            );
        }
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// How one group ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    /// Nothing in the group ever matched
    Absent,
    /// Matches existed and none is displayed any more
    Cleared,
    /// A match was still displayed when the deadline passed
    TimedOut,
    /// The driver failed while checking the group
    Failed {
        /// Driver error message
        message: String,
    },
}

impl GroupStatus {
    /// Whether the group is known to be out of the way
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Absent | Self::Cleared)
    }
}

/// Outcome for one loader group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    /// Group name
    pub name: String,
    /// Final status
    pub status: GroupStatus,
    /// Time spent on this group
    pub elapsed: Duration,
}

/// Outcome of a composite loader wait, for inspection only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderReport {
    /// Per-group outcomes in check order
    pub groups: Vec<GroupReport>,
    /// Total time spent
    pub elapsed: Duration,
}

impl LoaderReport {
    /// Whether every group is absent or cleared
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.groups.iter().all(|g| g.status.is_settled())
    }

    /// Report for the named group
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.name == name)
    }
}

// =============================================================================
// COMPOSITE WAIT
// =============================================================================

/// Wait until no group has a displayed match, sharing one deadline.
///
/// The session's implicit wait is zeroed for the duration and restored to
/// `restore_to` afterwards. Groups are checked in order; each gets at
/// least one probe even once the deadline has passed. A timeout too large
/// to represent as a deadline waits without one. Never fails.
pub fn wait_for_all_loaders_gone<D: Driver>(
    waiter: &Waiter<'_, D>,
    groups: &[LoaderGroup],
    timeout: Duration,
    restore_to: Duration,
) -> LoaderReport {
    let start = Instant::now();
    let deadline = start.checked_add(timeout);
    let _guard = ImplicitWaitGuard::zero(waiter.driver(), restore_to);

    let groups = groups
        .iter()
        .map(|group| {
            let group_start = Instant::now();
            let status = wait_for_group(waiter, group, deadline);
            let elapsed = group_start.elapsed();
            match &status {
                GroupStatus::TimedOut => tracing::warn!(
                    group = group.name(),
                    ?elapsed,
                    "loader still visible at deadline, proceeding"
                ),
                GroupStatus::Failed { message } => tracing::warn!(
                    group = group.name(),
                    error = %message,
                    "loader check failed, proceeding"
                ),
                settled => tracing::debug!(group = group.name(), status = ?settled, ?elapsed, "loader group settled"),
            }
            GroupReport {
                name: group.name().to_string(),
                status,
                elapsed,
            }
        })
        .collect();

    LoaderReport {
        groups,
        elapsed: start.elapsed(),
    }
}

fn wait_for_group<D: Driver>(
    waiter: &Waiter<'_, D>,
    group: &LoaderGroup,
    deadline: Option<Instant>,
) -> GroupStatus {
    let Some(first) = group.locators().first() else {
        return GroupStatus::Absent;
    };
    let budget = deadline.map_or(Duration::MAX, |d| d.saturating_duration_since(Instant::now()));
    let spec = waiter.spec(first, WaitCondition::InvisibleOfSet, budget);

    let mut ever_matched = false;
    let outcome = waiter.poll(&spec, budget, || {
        let scan = waiter.scan_set(group.locators())?;
        ever_matched |= scan.matched > 0;
        Ok(scan.visible.is_none().then_some(()))
    });

    match outcome {
        Ok(Some(())) if ever_matched => GroupStatus::Cleared,
        Ok(Some(())) => GroupStatus::Absent,
        Ok(None) => GroupStatus::TimedOut,
        Err(e) => GroupStatus::Failed {
            message: e.to_string(),
        },
    }
}
