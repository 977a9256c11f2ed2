//! Object repository documents.
//!
//! One XML document per page or screen maps symbolic element names to
//! per-platform locators:
//!
//! ```xml
//! <objects>
//!     <object name="txtEmail">
//!         <web locatorType="id" locatorValue="email"/>
//!         <android locatorType="id" locatorValue="com.app:id/email"/>
//!         <ios locatorType="xpath" locatorValue="//XCUIElementTypeTextField[1]"/>
//!     </object>
//! </objects>
//! ```
//!
//! The document is parsed once into an owned index and never mutated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::FrameworkConfig;
use crate::locator::{Locator, LocatorSpec, LocatorType};
use crate::platform::Platform;
use crate::result::{PagekitError, PagekitResult};
use crate::substitution::{substitute, SubstitutionMap};

const ROOT_TAG: &str = "objects";
const OBJECT_TAG: &str = "object";
const NAME_ATTR: &str = "name";
const TYPE_ATTR: &str = "locatorType";
const VALUE_ATTR: &str = "locatorValue";

/// Raw attributes of one platform child, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorEntry {
    /// Platform tag this entry was found under
    pub platform: Platform,
    /// `locatorType` attribute, if present
    pub locator_type: Option<String>,
    /// `locatorValue` attribute, if present
    pub locator_value: Option<String>,
}

/// One `object` entry: a name plus its platform-specific locators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
    name: String,
    entries: Vec<LocatorEntry>,
}

impl ElementDescriptor {
    /// Symbolic element name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry for `platform`, if the object declares one
    #[must_use]
    pub fn entry(&self, platform: Platform) -> Option<&LocatorEntry> {
        self.entries.iter().find(|e| e.platform == platform)
    }

    /// Platforms this object declares, in document order
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.entries.iter().map(|e| e.platform)
    }
}

/// A parsed repository document for one page or screen.
#[derive(Debug, Clone)]
pub struct ObjectRepository {
    path: PathBuf,
    platform: Platform,
    elements: Vec<ElementDescriptor>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
    unnamed: usize,
}

impl ObjectRepository {
    /// Open `file_name` from the repository directory configured for `platform`
    pub fn open(
        config: &FrameworkConfig,
        file_name: &str,
        platform: Platform,
    ) -> PagekitResult<Self> {
        Self::load(config.repository_path(platform, file_name), platform)
    }

    /// Read and parse a repository file
    pub fn load(path: impl AsRef<Path>, platform: Platform) -> PagekitResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PagekitError::RepositoryLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path, platform)
    }

    /// Parse repository text; `path` is recorded for error messages only
    pub fn parse(text: &str, path: impl Into<PathBuf>, platform: Platform) -> PagekitResult<Self> {
        let path = path.into();
        let load_error = |message: String| PagekitError::RepositoryLoad {
            path: path.clone(),
            message,
        };

        let doc = roxmltree::Document::parse(text).map_err(|e| load_error(e.to_string()))?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_TAG {
            return Err(load_error(format!(
                "expected <{ROOT_TAG}> root element, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut elements = Vec::new();
        let mut index = HashMap::new();
        let mut duplicates = Vec::new();
        let mut unnamed = 0;

        for object in root
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == OBJECT_TAG)
        {
            let Some(name) = object.attribute(NAME_ATTR).filter(|n| !n.trim().is_empty()) else {
                tracing::warn!(path = %path.display(), "skipping <object> without a name");
                unnamed += 1;
                continue;
            };

            let mut entries: Vec<LocatorEntry> = Vec::new();
            for child in object.descendants().skip(1).filter(|n| n.is_element()) {
                let Some(platform) = Platform::from_tag(child.tag_name().name()) else {
                    continue;
                };
                // first tag per platform wins
                if entries.iter().any(|e| e.platform == platform) {
                    continue;
                }
                entries.push(LocatorEntry {
                    platform,
                    locator_type: child.attribute(TYPE_ATTR).map(str::to_string),
                    locator_value: child.attribute(VALUE_ATTR).map(str::to_string),
                });
            }

            if index.contains_key(name) {
                tracing::warn!(
                    path = %path.display(),
                    element = name,
                    "duplicate element name, the first definition wins"
                );
                duplicates.push(name.to_string());
            } else {
                let _ = index.insert(name.to_string(), elements.len());
            }
            elements.push(ElementDescriptor {
                name: name.to_string(),
                entries,
            });
        }

        tracing::debug!(
            path = %path.display(),
            %platform,
            elements = index.len(),
            "loaded object repository"
        );

        Ok(Self {
            path,
            platform,
            elements,
            index,
            duplicates,
            unnamed,
        })
    }

    /// Source file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Platform this repository was opened for
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Number of distinct element names
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the repository defines no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every `object` entry in document order, duplicates included
    pub fn descriptors(&self) -> impl Iterator<Item = &ElementDescriptor> {
        self.elements.iter()
    }

    /// Distinct element names in document order
    #[must_use]
    pub fn element_names(&self) -> Vec<&str> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(i, d)| self.index.get(&d.name) == Some(i))
            .map(|(_, d)| d.name.as_str())
            .collect()
    }

    /// Descriptor for `name`; the first one when the name is duplicated
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&ElementDescriptor> {
        self.index.get(name).and_then(|&i| self.elements.get(i))
    }

    /// Names defined more than once
    #[must_use]
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Resolve `name` for `platform` into a validated [`LocatorSpec`]
    pub fn resolve(&self, name: &str, platform: Platform) -> PagekitResult<LocatorSpec> {
        if name.trim().is_empty() {
            return Err(PagekitError::EmptyElementName {
                path: self.path.clone(),
            });
        }

        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| PagekitError::ElementNotDefined {
                name: name.to_string(),
                path: self.path.clone(),
            })?;

        let entry =
            descriptor
                .entry(platform)
                .ok_or_else(|| PagekitError::MissingPlatformVariant {
                    name: name.to_string(),
                    platform,
                    path: self.path.clone(),
                })?;

        let malformed = |attribute| PagekitError::MalformedLocatorEntry {
            name: name.to_string(),
            platform,
            attribute,
            path: self.path.clone(),
        };
        let raw_type = entry.locator_type.as_deref().ok_or_else(|| malformed(TYPE_ATTR))?;
        let value = entry
            .locator_value
            .as_deref()
            .ok_or_else(|| malformed(VALUE_ATTR))?;

        let locator_type =
            LocatorType::parse(raw_type).ok_or_else(|| PagekitError::UnsupportedLocatorType {
                name: name.to_string(),
                locator_type: raw_type.to_string(),
                path: self.path.clone(),
            })?;

        tracing::debug!(element = name, %platform, %locator_type, value, "resolved locator");
        Ok(LocatorSpec::new(name, platform, locator_type, value))
    }

    /// Resolve and compile `name` for this repository's platform
    pub fn locator(&self, name: &str) -> PagekitResult<Locator> {
        Ok(self.resolve(name, self.platform)?.compile().with_repository(&self.path))
    }

    /// Resolve, substitute `tokens`, and compile `name`
    pub fn locator_with(&self, name: &str, tokens: &SubstitutionMap) -> PagekitResult<Locator> {
        let spec = self.resolve(name, self.platform)?;
        Ok(substitute(&spec, tokens).compile().with_repository(&self.path))
    }

    /// Resolve every element for every platform in `platforms`, collecting
    /// all problems instead of stopping at the first
    #[must_use]
    pub fn validate(&self, platforms: &[Platform]) -> Vec<PagekitError> {
        let mut problems: Vec<PagekitError> = (0..self.unnamed)
            .map(|_| PagekitError::EmptyElementName {
                path: self.path.clone(),
            })
            .collect();

        problems.extend(
            self.duplicates
                .iter()
                .map(|name| PagekitError::DuplicateElement {
                    name: name.clone(),
                    path: self.path.clone(),
                }),
        );

        for name in self.element_names() {
            for &platform in platforms {
                if let Err(e) = self.resolve(name, platform) {
                    problems.push(e);
                }
            }
        }
        problems
    }
}
