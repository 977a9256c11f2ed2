//! Page Object Model support.
//!
//! A [`SessionContext`] carries the driver, configuration and platform of
//! one test session explicitly; nothing here is global or thread-local.
//! A [`Page`] binds one object repository to a session and exposes
//! name-based waits. Concrete page types implement [`PageObject`].
//!
//! # Example
//!
//! ```ignore
//! struct LoginPage<'s, D: Driver> {
//!     page: Page<'s, D>,
//! }
//!
//! impl<'s, D: Driver> PageObject<'s, D> for LoginPage<'s, D> {
//!     const REPOSITORY: &'static str = "LoginPage.xml";
//!
//!     fn from_page(page: Page<'s, D>) -> Self {
//!         Self { page }
//!     }
//!
//!     fn page(&self) -> &Page<'s, D> {
//!         &self.page
//!     }
//! }
//!
//! impl<D: Driver> LoginPage<'_, D> {
//!     pub fn submit(&self) -> PagekitResult<D::Element> {
//!         self.page.wait_for_loaders();
//!         self.page.wait_for_clickable("btnLogin")
//!     }
//! }
//! ```

use std::time::Duration;

use crate::config::FrameworkConfig;
use crate::driver::Driver;
use crate::loader::{wait_for_all_loaders_gone, LoaderGroup, LoaderReport};
use crate::locator::Locator;
use crate::platform::Platform;
use crate::repository::ObjectRepository;
use crate::result::{PagekitError, PagekitResult};
use crate::substitution::{find_placeholder, substitute, SubstitutionMap};
use crate::wait::Waiter;

// =============================================================================
// SESSION CONTEXT
// =============================================================================

/// Driver, configuration and platform for one test session.
#[derive(Debug)]
pub struct SessionContext<'s, D: Driver> {
    driver: &'s D,
    config: &'s FrameworkConfig,
    platform: Platform,
}

impl<D: Driver> Clone for SessionContext<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Driver> Copy for SessionContext<'_, D> {}

impl<'s, D: Driver> SessionContext<'s, D> {
    /// Bind a session
    #[must_use]
    pub const fn new(driver: &'s D, config: &'s FrameworkConfig, platform: Platform) -> Self {
        Self {
            driver,
            config,
            platform,
        }
    }

    /// Session driver
    #[must_use]
    pub const fn driver(&self) -> &'s D {
        self.driver
    }

    /// Framework configuration
    #[must_use]
    pub const fn config(&self) -> &'s FrameworkConfig {
        self.config
    }

    /// Session platform
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Waiter using the configured poll interval
    #[must_use]
    pub fn waiter(&self) -> Waiter<'s, D> {
        Waiter::new(self.driver).with_poll_interval(self.config.poll_interval())
    }

    /// Load `file_name` from the platform's repository directory
    pub fn open_page(&self, file_name: &str) -> PagekitResult<Page<'s, D>> {
        let repository = ObjectRepository::open(self.config, file_name, self.platform)?;
        Ok(Page::new(*self, repository))
    }
}

// =============================================================================
// ELEMENT REFERENCE
// =============================================================================

/// A repository element name, optionally with placeholder values.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    name: &'a str,
    tokens: Option<&'a SubstitutionMap>,
}

impl<'a> ElementRef<'a> {
    /// Plain element name
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name, tokens: None }
    }

    /// Element name whose locator needs substitution
    #[must_use]
    pub const fn with(name: &'a str, tokens: &'a SubstitutionMap) -> Self {
        Self {
            name,
            tokens: Some(tokens),
        }
    }

    /// Element name
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::new(name)
    }
}

impl<'a> From<(&'a str, &'a SubstitutionMap)> for ElementRef<'a> {
    fn from((name, tokens): (&'a str, &'a SubstitutionMap)) -> Self {
        Self::with(name, tokens)
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// One object repository bound to a session.
#[derive(Debug)]
pub struct Page<'s, D: Driver> {
    ctx: SessionContext<'s, D>,
    repository: ObjectRepository,
    loader_groups: Vec<LoaderGroup>,
}

impl<'s, D: Driver> Page<'s, D> {
    /// Bind an already-loaded repository; loader groups start as the defaults
    #[must_use]
    pub fn new(ctx: SessionContext<'s, D>, repository: ObjectRepository) -> Self {
        Self {
            ctx,
            repository,
            loader_groups: LoaderGroup::defaults(),
        }
    }

    /// Replace the loader groups checked by [`wait_for_loaders`](Self::wait_for_loaders)
    #[must_use]
    pub fn with_loader_groups(mut self, groups: Vec<LoaderGroup>) -> Self {
        self.loader_groups = groups;
        self
    }

    /// Session this page is bound to
    #[must_use]
    pub const fn context(&self) -> SessionContext<'s, D> {
        self.ctx
    }

    /// Underlying repository
    #[must_use]
    pub const fn repository(&self) -> &ObjectRepository {
        &self.repository
    }

    /// Loader groups in check order
    #[must_use]
    pub fn loader_groups(&self) -> &[LoaderGroup] {
        &self.loader_groups
    }

    /// Resolve, substitute and compile an element for the session platform
    pub fn locator<'a>(&self, element: impl Into<ElementRef<'a>>) -> PagekitResult<Locator> {
        let element = element.into();
        let mut spec = self.repository.resolve(element.name, self.ctx.platform)?;
        if let Some(tokens) = element.tokens {
            spec = substitute(&spec, tokens);
        }
        if self.ctx.config.strict_placeholders {
            if let Some(placeholder) = find_placeholder(&spec.value) {
                return Err(PagekitError::UnresolvedPlaceholder {
                    name: spec.element,
                    placeholder: placeholder.to_string(),
                    platform: spec.platform,
                    path: self.repository.path().to_path_buf(),
                });
            }
        }
        Ok(spec.compile().with_repository(self.repository.path()))
    }

    /// Wait for the element to exist in the document
    pub fn wait_for_present<'a>(&self, element: impl Into<ElementRef<'a>>) -> PagekitResult<D::Element> {
        let locator = self.locator(element)?;
        self.ctx
            .waiter()
            .wait_for_present(&locator, self.ctx.config.element_timeout())
    }

    /// Wait for the element to be displayed
    pub fn wait_for_visible<'a>(&self, element: impl Into<ElementRef<'a>>) -> PagekitResult<D::Element> {
        let locator = self.locator(element)?;
        self.ctx
            .waiter()
            .wait_for_visible(&locator, self.ctx.config.element_timeout())
    }

    /// Wait for the element to be displayed and enabled
    pub fn wait_for_clickable<'a>(
        &self,
        element: impl Into<ElementRef<'a>>,
    ) -> PagekitResult<D::Element> {
        let locator = self.locator(element)?;
        self.ctx
            .waiter()
            .wait_for_clickable(&locator, self.ctx.config.element_timeout())
    }

    /// Wait until no match of the element is displayed
    pub fn wait_for_hidden<'a>(&self, element: impl Into<ElementRef<'a>>) -> PagekitResult<()> {
        let locator = self.locator(element)?;
        self.ctx
            .waiter()
            .wait_for_invisible(std::slice::from_ref(&locator), self.ctx.config.element_timeout())
    }

    /// Whether the element becomes displayed within `timeout`.
    ///
    /// Never fails: resolution errors answer `false` too.
    #[must_use]
    pub fn is_displayed<'a>(&self, element: impl Into<ElementRef<'a>>, timeout: Duration) -> bool {
        let element = element.into();
        match self.locator(element) {
            Ok(locator) => self.ctx.waiter().is_displayed(&locator, timeout),
            Err(e) => {
                tracing::debug!(element = element.name, error = %e, "element not resolvable, treating as not displayed");
                false
            }
        }
    }

    /// Current matches, without waiting
    pub fn elements<'a>(&self, element: impl Into<ElementRef<'a>>) -> PagekitResult<Vec<D::Element>> {
        let locator = self.locator(element)?;
        self.ctx.waiter().find_all(&locator)
    }

    /// Number of matches once at least one exists; zero if none appear within `timeout`
    pub fn count<'a>(&self, element: impl Into<ElementRef<'a>>, timeout: Duration) -> PagekitResult<usize> {
        let locator = self.locator(element)?;
        match self.ctx.waiter().wait_for_all_present(&locator, timeout) {
            Ok(found) => Ok(found.len()),
            Err(PagekitError::ElementNotFound { .. }) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Pause for the settle delay, then wait for every loader group with
    /// the configured loader timeout
    pub fn wait_for_loaders(&self) -> LoaderReport {
        self.wait_for_loaders_within(self.ctx.config.loader_timeout())
    }

    /// As [`wait_for_loaders`](Self::wait_for_loaders) with an explicit timeout
    pub fn wait_for_loaders_within(&self, timeout: Duration) -> LoaderReport {
        let settle = self.ctx.config.loader_settle_delay();
        if !settle.is_zero() {
            std::thread::sleep(settle);
        }
        wait_for_all_loaders_gone(
            &self.ctx.waiter(),
            &self.loader_groups,
            timeout,
            self.ctx.config.implicit_wait(),
        )
    }
}

// =============================================================================
// PAGE OBJECT
// =============================================================================

/// A page or screen backed by one repository file.
pub trait PageObject<'s, D: Driver>: Sized {
    /// Repository file name, relative to the platform's repository directory
    const REPOSITORY: &'static str;

    /// Wrap a loaded page
    fn from_page(page: Page<'s, D>) -> Self;

    /// The wrapped page
    fn page(&self) -> &Page<'s, D>;

    /// Load the repository for the session platform and construct the page
    fn open(ctx: SessionContext<'s, D>) -> PagekitResult<Self> {
        let page = ctx.open_page(Self::REPOSITORY)?;
        tracing::debug!(
            page = std::any::type_name::<Self>(),
            repository = %page.repository().path().display(),
            "opened page object"
        );
        Ok(Self::from_page(page))
    }
}
