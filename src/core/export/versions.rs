//! Default version resolution
//!
//! A work may carry many versions per language. Exactly one per language is
//! its default: the first one encountered in stored order.

use crate::domain::{Version, Work, PRIMARY_LANGUAGE, TRANSLATION_LANGUAGE};
use std::collections::BTreeMap;

/// Default version per language of one work
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultVersions {
    by_language: BTreeMap<String, Version>,
}

impl DefaultVersions {
    /// Default version for a language, if the work has one
    pub fn get(&self, language: &str) -> Option<&Version> {
        self.by_language.get(language)
    }

    /// Default version title for a language
    pub fn title(&self, language: &str) -> Option<&str> {
        self.get(language).map(|v| v.title.as_str())
    }

    /// Languages that have a default, in sorted order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_language.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }
}

/// Resolve the default version of every language of a work
///
/// Scans versions in stored order and assigns the first version seen to each
/// language not yet assigned. Stops as soon as both the primary and the
/// translation language are assigned.
///
/// # Examples
///
/// ```
/// use quire::core::export::resolve_defaults;
/// use quire::domain::{Version, Work, WorkTitle};
///
/// let work = Work {
///     title: WorkTitle::new("Genesis").unwrap(),
///     he_title: "בראשית".to_string(),
///     categories: vec![],
///     versions: vec![Version::new("A", "en"), Version::new("B", "he")],
/// };
/// let defaults = resolve_defaults(&work);
/// assert_eq!(defaults.title("en"), Some("A"));
/// assert_eq!(defaults.title("he"), Some("B"));
/// ```
pub fn resolve_defaults(work: &Work) -> DefaultVersions {
    let mut by_language = BTreeMap::new();

    for version in &work.versions {
        if by_language.contains_key(PRIMARY_LANGUAGE)
            && by_language.contains_key(TRANSLATION_LANGUAGE)
        {
            break;
        }
        by_language
            .entry(version.language.clone())
            .or_insert_with(|| version.clone());
    }

    DefaultVersions { by_language }
}
