//! Corpus collaborator traits
//!
//! These traits are the read interface the export pipeline consumes. The
//! storage engine behind them is not part of Quire; any backing store that
//! implements them can be exported.

use crate::domain::work::{Link, TextChunk, TextRef, Work};
use crate::domain::{Result, WorkTitle};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read access to the corpus
///
/// Lookups of unknown titles or references fail with
/// [`QuireError::Resolution`](crate::domain::QuireError::Resolution).
#[async_trait]
pub trait Corpus: Send + Sync {
    /// Look up a work by title
    async fn work(&self, title: &WorkTitle) -> Result<Work>;

    /// Top-level structural units of a work, in document order
    async fn top_section_refs(&self, title: &WorkTitle) -> Result<Vec<TextRef>>;

    /// Section-level descendants of a reference, in document order
    ///
    /// A section-level reference yields itself.
    async fn section_refs(&self, reference: &TextRef) -> Result<Vec<TextRef>>;

    /// Text of a reference in one language, pinned to stored versions with
    /// no inheritance from ancestor or commentary context
    async fn text_chunk(&self, reference: &TextRef, language: &str) -> Result<TextChunk>;

    /// Links anchored to exactly this segment reference
    async fn links_for(&self, segment_ref: &str) -> Result<Vec<Link>>;

    /// The work's index record including content counts
    async fn index_contents(&self, title: &WorkTitle) -> Result<Map<String, Value>>;

    /// Raw table of contents tree
    async fn toc(&self) -> Result<Value>;

    /// Raw search-facet tree
    async fn search_toc(&self) -> Result<Value>;

    /// Names of all text categories
    async fn text_categories(&self) -> Result<Vec<String>>;

    /// Hebrew name of a category term, `None` when the term is unknown
    async fn hebrew_term(&self, name: &str) -> Result<Option<String>>;

    /// Raw person names; entries that are not strings are ignored by callers
    async fn people(&self) -> Result<Vec<Value>>;

    /// Regular expressions matching every reference inside a work
    async fn ref_patterns(&self, title: &WorkTitle) -> Result<Vec<String>>;

    /// Resolve a free-form reference string
    async fn resolve_ref(&self, reference: &str) -> Result<TextRef>;
}

/// One category of history query
///
/// Pattern-based queries match when any pattern matches the recorded
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryQuery {
    /// Edits to the work's own text
    TextEdits { patterns: Vec<String> },
    /// Link edits whose previous link set referenced the work
    OldLinkRefs { patterns: Vec<String> },
    /// Link edits whose new link set references the work
    NewLinkRefs { patterns: Vec<String> },
    /// Edits to the work's index record
    IndexEdits { title: WorkTitle },
}

/// Audit log of corpus edits
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Number of records matching `query` strictly after `since`
    async fn count(&self, query: &HistoryQuery, since: DateTime<Utc>) -> Result<u64>;
}

/// Daily reading cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalendarCycle {
    #[serde(rename = "parasha")]
    Parasha,
    #[serde(rename = "dafyomi")]
    DafYomi,
    #[serde(rename = "mishnah")]
    Mishnah,
    #[serde(rename = "rambam")]
    Rambam,
    #[serde(rename = "929")]
    Tanakh929,
}

impl CalendarCycle {
    /// All cycles, in output order
    pub const ALL: [CalendarCycle; 5] = [
        CalendarCycle::Parasha,
        CalendarCycle::DafYomi,
        CalendarCycle::Mishnah,
        CalendarCycle::Rambam,
        CalendarCycle::Tanakh929,
    ];

    /// Key of the cycle in the calendar artifact
    pub fn key(&self) -> &'static str {
        match self {
            CalendarCycle::Parasha => "parasha",
            CalendarCycle::DafYomi => "dafyomi",
            CalendarCycle::Mishnah => "mishnah",
            CalendarCycle::Rambam => "rambam",
            CalendarCycle::Tanakh929 => "929",
        }
    }
}

/// One daily reading assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub date: NaiveDate,

    /// Unresolved reference of the reading
    pub reference: String,

    /// Cycle-specific fields passed through to output
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// Source of calendar records
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Records of one cycle dated within `from..=until`, ordered by date
    async fn entries(
        &self,
        cycle: CalendarCycle,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<CalendarRecord>>;
}
