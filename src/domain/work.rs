//! Read-model types returned by the corpus
//!
//! These types describe what the export pipeline consumes from the backing
//! store: works, their versions, structural references, per-language text
//! chunks and cross-reference links. They are read-only to the pipeline.

use super::ids::WorkTitle;
use serde::{Deserialize, Serialize};

/// Language code of a work's primary (original) text
pub const PRIMARY_LANGUAGE: &str = "he";

/// Language code of a work's translation text
pub const TRANSLATION_LANGUAGE: &str = "en";

/// Link categories whose name survives into exported link records
pub const EXPORTED_LINK_CATEGORIES: [&str; 2] = ["Quoting Commentary", "Targum"];

/// A named textual entity in the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// Globally unique title
    pub title: WorkTitle,

    /// Localized (Hebrew) title
    #[serde(default)]
    pub he_title: String,

    /// Category path of the work, outermost first
    #[serde(default)]
    pub categories: Vec<String>,

    /// Versions in stored order
    #[serde(default)]
    pub versions: Vec<Version>,
}

/// One complete rendition of a work's text in one language
///
/// Attribution members are explicitly optional; an empty string in the
/// backing record is treated the same as an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    /// Version title, unique within a work and language
    pub title: String,

    /// Language code
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_in_hebrew: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_in_hebrew: Option<String>,
}

impl Version {
    /// Creates a version with only a title and language
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            ..Default::default()
        }
    }
}

/// A structural address within a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRef {
    /// Normalized reference string, e.g. `Genesis 1`
    pub normal: String,

    /// Localized normalized reference string
    #[serde(default)]
    pub he_normal: String,

    /// Title of the owning work
    pub index_title: WorkTitle,

    /// Localized title of the owning work
    #[serde(default)]
    pub he_title: String,

    /// Normalized reference of the enclosing section
    pub section_ref: String,

    /// Whether this reference addresses a leaf containing segments
    pub is_section_level: bool,

    /// Next sibling section, absent at structural boundaries
    #[serde(default)]
    pub next: Option<String>,

    /// Previous sibling section, absent at structural boundaries
    #[serde(default)]
    pub prev: Option<String>,
}

impl TextRef {
    /// Reference of the segment at a 1-based position inside this section
    pub fn segment_ref(&self, segment_number: usize) -> String {
        format!("{}:{}", self.normal, segment_number)
    }
}

/// Text of one reference in one language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextChunk {
    /// Language code of the chunk
    pub language: String,

    /// Segment texts in order; segment `n` lives at index `n - 1`
    #[serde(default)]
    pub segments: Vec<String>,

    /// The single version this chunk was rendered from, if any
    #[serde(default)]
    pub version: Option<Version>,

    /// Whether the chunk was synthesized from more than one version
    #[serde(default)]
    pub is_merged: bool,

    /// Version titles that contributed to a merged chunk
    #[serde(default)]
    pub sources: Vec<String>,
}

impl TextChunk {
    /// Segment text at a 1-based position, if present and non-empty
    pub fn segment(&self, segment_number: usize) -> Option<&str> {
        segment_number
            .checked_sub(1)
            .and_then(|i| self.segments.get(i))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A directed association from a segment to a reference in another work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Normalized reference on the other end of the link
    pub source_ref: String,

    /// Localized reference on the other end of the link
    #[serde(default)]
    pub source_he_ref: String,

    /// Link category, e.g. `Commentary`
    #[serde(default)]
    pub category: Option<String>,
}

/// Returns the value only when it is present and non-empty
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
