//! Dynamic locator substitution.
//!
//! Repository values may carry placeholder tokens such as
//! `//*[@id='$$countryName$$']`. A [`SubstitutionMap`] rewrites them before
//! the locator is compiled.

use regex::Regex;
use std::sync::OnceLock;

use crate::locator::LocatorSpec;

/// Ordered token → value pairs applied to a locator value.
///
/// Replacement follows insertion order. Re-inserting an existing token
/// updates its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
}

impl SubstitutionMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, builder style
    #[must_use]
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(token, value);
        self
    }

    /// Add or update a pair
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(t, _)| *t == token) {
            slot.1 = value;
        } else {
            self.entries.push((token, value));
        }
    }

    /// Pairs in application order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every pair to `input` in order; empty tokens are skipped
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (token, value) in self.iter() {
            // str::replace with an empty pattern would insert `value` between every char
            if token.is_empty() {
                tracing::warn!(value, "ignoring empty substitution token");
                continue;
            }
            out = out.replace(token, value);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for SubstitutionMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Replace every token occurrence in the spec's value.
///
/// Sequential and without re-scanning: a later token can match text that
/// an earlier replacement introduced. Placeholders with no matching token
/// pass through untouched.
#[must_use]
pub fn substitute(spec: &LocatorSpec, tokens: &SubstitutionMap) -> LocatorSpec {
    let value = tokens.apply(&spec.value);
    if let Some(leftover) = find_placeholder(&value) {
        tracing::warn!(
            element = %spec.element,
            placeholder = leftover,
            "locator still contains a placeholder after substitution"
        );
    }
    LocatorSpec {
        value,
        ..spec.clone()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\$[^$\s]+\$\$").expect("placeholder pattern is valid"))
}

/// First `$$token$$` placeholder left in `value`, if any
#[must_use]
pub fn find_placeholder(value: &str) -> Option<&str> {
    placeholder_pattern().find(value).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::LocatorType;
    use crate::platform::Platform;

    fn xpath_spec(value: &str) -> LocatorSpec {
        LocatorSpec::new("lblCountry", Platform::Web, LocatorType::Xpath, value)
    }

    mod map_tests {
        use super::*;

        #[test]
        fn test_insert_keeps_first_position() {
            let mut map = SubstitutionMap::new().with("$$a$$", "1").with("$$b$$", "2");
            map.insert("$$a$$", "9");
            let pairs: Vec<_> = map.iter().collect();
            assert_eq!(pairs, vec![("$$a$$", "9"), ("$$b$$", "2")]);
            assert_eq!(map.len(), 2);
        }

        #[test]
        fn test_from_array() {
            let map = SubstitutionMap::from([("$$x$$", "y")]);
            assert!(!map.is_empty());
            assert_eq!(map.apply("$$x$$"), "y");
        }

        #[test]
        fn test_empty_token_is_ignored() {
            let map = SubstitutionMap::from([("", "X")]);
            assert_eq!(map.apply("abc"), "abc");
        }
    }

    mod substitute_tests {
        use super::*;

        #[test]
        fn test_country_scenario() {
            let spec = xpath_spec("//*[@id='$$countryName$$']");
            let tokens = SubstitutionMap::from([("$$countryName$$", "USA")]);
            let out = substitute(&spec, &tokens);
            assert_eq!(out.value, "//*[@id='USA']");
            assert_eq!(out.locator_type, LocatorType::Xpath);
            assert_eq!(out.element, "lblCountry");
        }

        #[test]
        fn test_replaces_every_occurrence() {
            let spec = xpath_spec("//td[text()='$$v$$' or @title='$$v$$']");
            let out = substitute(&spec, &SubstitutionMap::from([("$$v$$", "Ok")]));
            assert_eq!(out.value, "//td[text()='Ok' or @title='Ok']");
        }

        #[test]
        fn test_sequential_replacement_can_chain() {
            let spec = xpath_spec("//x[@id='$$a$$']");
            let tokens = SubstitutionMap::new().with("$$a$$", "$$b$$").with("$$b$$", "final");
            assert_eq!(substitute(&spec, &tokens).value, "//x[@id='final']");
        }

        #[test]
        fn test_unmatched_placeholder_passes_through() {
            let spec = xpath_spec("//x[@id='$$missing$$']");
            let out = substitute(&spec, &SubstitutionMap::new());
            assert_eq!(out.value, "//x[@id='$$missing$$']");
        }
    }

    mod placeholder_tests {
        use super::*;

        #[test]
        fn test_finds_first_placeholder() {
            assert_eq!(find_placeholder("//a[@id='$$one$$_$$two$$']"), Some("$$one$$"));
        }

        #[test]
        fn test_ignores_plain_dollars() {
            assert_eq!(find_placeholder("//span[text()='$5.00']"), None);
            assert_eq!(find_placeholder("//span[text()='$$ $$']"), None);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_independent_tokens_commute(
                a in "[a-z0-9]{1,8}",
                b in "[a-z0-9]{1,8}"
            ) {
                let spec = xpath_spec("//x[@id='$$a$$_$$b$$']");
                let forward = SubstitutionMap::new().with("$$a$$", a.clone()).with("$$b$$", b.clone());
                let reverse = SubstitutionMap::new().with("$$b$$", b.clone()).with("$$a$$", a.clone());
                let expected = format!("//x[@id='{a}_{b}']");
                prop_assert_eq!(&substitute(&spec, &forward).value, &expected);
                prop_assert_eq!(&substitute(&spec, &reverse).value, &expected);
            }

            #[test]
            fn prop_empty_map_is_identity(value in ".*") {
                let spec = xpath_spec(&value);
                prop_assert_eq!(substitute(&spec, &SubstitutionMap::new()), spec);
            }
        }
    }
}
