//! JSON snapshot corpus
//!
//! [`CorpusSnapshot`] loads a JSON dump of the corpus read interface into
//! memory and serves [`Corpus`], [`HistoryLog`] and [`CalendarSource`] from
//! it. Section navigation is derived from the document order of a work's
//! section-level references.
//!
//! # Snapshot layout
//!
//! ```json
//! {
//!   "works": [{
//!     "title": "Foo", "he_title": "פו", "categories": ["Tanakh"],
//!     "versions": [{"title": "Foo EN", "language": "en"}],
//!     "units": [{"ref": "Foo 1", "he_ref": "פו א",
//!                "text": {"en": {"segments": ["a", "b"]}}}]
//!   }],
//!   "links": {"Foo 1:1": [{"source_ref": "Bar 2:3", "category": "Commentary"}]},
//!   "toc": [], "search_toc": [], "terms": {}, "text_categories": [], "people": [],
//!   "history": [{"date": "2025-01-02T00:00:00Z", "ref": "Foo 1:1"}],
//!   "calendar": {"parasha": [{"date": "2025-01-04", "reference": "Foo 1:1-2:3"}]},
//!   "aliases": {"Foo 1:1-2:3": "Foo 1"}
//! }
//! ```
//!
//! `aliases` maps reference strings that are not stored verbatim, such as
//! ranges, to the stored reference they resolve to. A unit without `sections` is itself section-level. A chunk without a
//! `version` was rendered from the language's first stored version; a chunk
//! with `merged_from` was synthesized from those versions.

use super::traits::{CalendarCycle, CalendarRecord, CalendarSource, Corpus, HistoryLog, HistoryQuery};
use crate::domain::work::{Link, TextChunk, TextRef, Version, Work};
use crate::domain::{QuireError, Result, WorkTitle};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    works: Vec<WorkEntry>,
    #[serde(default)]
    links: HashMap<String, Vec<Link>>,
    #[serde(default = "empty_array")]
    toc: Value,
    #[serde(default = "empty_array")]
    search_toc: Value,
    #[serde(default)]
    terms: HashMap<String, String>,
    #[serde(default)]
    text_categories: Vec<String>,
    #[serde(default)]
    people: Vec<Value>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    calendar: HashMap<String, Vec<CalendarRecord>>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct WorkEntry {
    #[serde(flatten)]
    work: Work,
    #[serde(default)]
    index: Option<Map<String, Value>>,
    #[serde(default)]
    units: Vec<UnitEntry>,
}

#[derive(Debug, Deserialize)]
struct UnitEntry {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default)]
    he_ref: String,
    #[serde(default)]
    sections: Vec<SectionEntry>,
    #[serde(default)]
    text: BTreeMap<String, ChunkEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct SectionEntry {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default)]
    he_ref: String,
    #[serde(default)]
    text: BTreeMap<String, ChunkEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChunkEntry {
    #[serde(default)]
    segments: Vec<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    merged_from: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    date: DateTime<Utc>,
    #[serde(rename = "ref", default)]
    reference: Option<String>,
    #[serde(default)]
    old_refs: Vec<String>,
    #[serde(default)]
    new_refs: Vec<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Where a reference string points inside the snapshot
#[derive(Debug, Clone, Copy)]
enum RefTarget {
    Work(usize),
    Unit(usize, usize),
    Section(usize, usize),
}

/// In-memory corpus loaded from a JSON snapshot
#[derive(Debug)]
pub struct CorpusSnapshot {
    works: Vec<WorkEntry>,
    /// Section-level entries of each work in document order
    sections: Vec<Vec<SectionEntry>>,
    by_title: HashMap<String, usize>,
    by_ref: HashMap<String, RefTarget>,
    links: HashMap<String, Vec<Link>>,
    toc: Value,
    search_toc: Value,
    terms: HashMap<String, String>,
    text_categories: Vec<String>,
    people: Vec<Value>,
    history: Vec<HistoryEntry>,
    calendar: HashMap<String, Vec<CalendarRecord>>,
    aliases: HashMap<String, String>,
}

impl CorpusSnapshot {
    /// Load a snapshot file
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read and a serialization
    /// error if it is not a valid snapshot.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            QuireError::Io(format!(
                "Failed to read corpus snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        let snapshot = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            works = snapshot.works.len(),
            "Loaded corpus snapshot"
        );
        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(contents)?;
        Self::build(file)
    }

    /// Build a snapshot from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_value(value)?;
        Self::build(file)
    }

    fn build(file: SnapshotFile) -> Result<Self> {
        let mut by_title = HashMap::new();
        let mut by_ref = HashMap::new();
        let mut sections = Vec::with_capacity(file.works.len());

        for (w, entry) in file.works.iter().enumerate() {
            let title = entry.work.title.as_str().to_string();
            if by_title.insert(title.clone(), w).is_some() {
                return Err(QuireError::Serialization(format!(
                    "Duplicate work title in snapshot: {title}"
                )));
            }
            by_ref.entry(title).or_insert(RefTarget::Work(w));

            let mut ordered = Vec::new();
            for (u, unit) in entry.units.iter().enumerate() {
                if unit.sections.is_empty() {
                    by_ref.insert(unit.reference.clone(), RefTarget::Section(w, ordered.len()));
                    ordered.push(SectionEntry {
                        reference: unit.reference.clone(),
                        he_ref: unit.he_ref.clone(),
                        text: unit.text.clone(),
                    });
                } else {
                    by_ref.insert(unit.reference.clone(), RefTarget::Unit(w, u));
                    for section in &unit.sections {
                        by_ref.insert(
                            section.reference.clone(),
                            RefTarget::Section(w, ordered.len()),
                        );
                        ordered.push(section.clone());
                    }
                }
            }
            sections.push(ordered);
        }

        Ok(Self {
            works: file.works,
            sections,
            by_title,
            by_ref,
            links: file.links,
            toc: file.toc,
            search_toc: file.search_toc,
            terms: file.terms,
            text_categories: file.text_categories,
            people: file.people,
            history: file.history,
            calendar: file.calendar,
            aliases: file.aliases,
        })
    }

    fn work_index(&self, title: &str) -> Result<usize> {
        self.by_title
            .get(title)
            .copied()
            .ok_or_else(|| QuireError::Resolution(format!("Unknown work: {title}")))
    }

    fn section_ref(&self, w: usize, s: usize) -> TextRef {
        let work = &self.works[w].work;
        let ordered = &self.sections[w];
        let section = &ordered[s];
        TextRef {
            normal: section.reference.clone(),
            he_normal: section.he_ref.clone(),
            index_title: work.title.clone(),
            he_title: work.he_title.clone(),
            section_ref: section.reference.clone(),
            is_section_level: true,
            next: ordered.get(s + 1).map(|n| n.reference.clone()),
            prev: s
                .checked_sub(1)
                .and_then(|p| ordered.get(p))
                .map(|p| p.reference.clone()),
        }
    }

    fn unit_ref(&self, w: usize, u: usize) -> TextRef {
        let work = &self.works[w].work;
        let unit = &self.works[w].units[u];
        TextRef {
            normal: unit.reference.clone(),
            he_normal: unit.he_ref.clone(),
            index_title: work.title.clone(),
            he_title: work.he_title.clone(),
            section_ref: unit.reference.clone(),
            is_section_level: false,
            next: None,
            prev: None,
        }
    }

    fn work_ref(&self, w: usize) -> TextRef {
        let work = &self.works[w].work;
        TextRef {
            normal: work.title.as_str().to_string(),
            he_normal: work.he_title.clone(),
            index_title: work.title.clone(),
            he_title: work.he_title.clone(),
            section_ref: work.title.as_str().to_string(),
            is_section_level: false,
            next: None,
            prev: None,
        }
    }

    fn target(&self, reference: &str) -> Result<RefTarget> {
        self.by_ref
            .get(reference)
            .or_else(|| {
                self.aliases
                    .get(reference)
                    .and_then(|stored| self.by_ref.get(stored))
            })
            .copied()
            .ok_or_else(|| QuireError::Resolution(format!("Unknown reference: {reference}")))
    }

    fn to_ref(&self, target: RefTarget) -> TextRef {
        match target {
            RefTarget::Work(w) => self.work_ref(w),
            RefTarget::Unit(w, u) => self.unit_ref(w, u),
            RefTarget::Section(w, s) => self.section_ref(w, s),
        }
    }

    fn to_chunk(&self, work: &Work, language: &str, entry: Option<&ChunkEntry>) -> Result<TextChunk> {
        let Some(entry) = entry else {
            return Ok(TextChunk {
                language: language.to_string(),
                ..Default::default()
            });
        };

        if !entry.merged_from.is_empty() {
            return Ok(TextChunk {
                language: language.to_string(),
                segments: entry.segments.clone(),
                version: None,
                is_merged: true,
                sources: entry.merged_from.clone(),
            });
        }

        let in_language = |v: &&Version| v.language == language;
        let version = match &entry.version {
            Some(name) => Some(
                work.versions
                    .iter()
                    .filter(in_language)
                    .find(|v| &v.title == name)
                    .cloned()
                    .ok_or_else(|| {
                        QuireError::Materialization(format!(
                            "Version '{name}' ({language}) not found on {}",
                            work.title
                        ))
                    })?,
            ),
            None => work.versions.iter().find(in_language).cloned(),
        };

        Ok(TextChunk {
            language: language.to_string(),
            segments: entry.segments.clone(),
            version,
            is_merged: false,
            sources: Vec::new(),
        })
    }

    fn content_counts(&self, w: usize) -> Vec<Value> {
        self.sections[w]
            .iter()
            .map(|s| {
                let count = s.text.values().map(|c| c.segments.len()).max().unwrap_or(0);
                Value::from(count)
            })
            .collect()
    }
}

#[async_trait]
impl Corpus for CorpusSnapshot {
    async fn work(&self, title: &WorkTitle) -> Result<Work> {
        let w = self.work_index(title.as_str())?;
        Ok(self.works[w].work.clone())
    }

    async fn top_section_refs(&self, title: &WorkTitle) -> Result<Vec<TextRef>> {
        let w = self.work_index(title.as_str())?;
        let mut refs = Vec::with_capacity(self.works[w].units.len());
        for unit in &self.works[w].units {
            refs.push(self.to_ref(self.target(&unit.reference)?));
        }
        Ok(refs)
    }

    async fn section_refs(&self, reference: &TextRef) -> Result<Vec<TextRef>> {
        match self.target(&reference.normal)? {
            RefTarget::Section(w, s) => Ok(vec![self.section_ref(w, s)]),
            RefTarget::Unit(w, u) => {
                let unit = &self.works[w].units[u];
                let mut refs = Vec::with_capacity(unit.sections.len());
                for section in &unit.sections {
                    refs.push(self.to_ref(self.target(&section.reference)?));
                }
                Ok(refs)
            }
            RefTarget::Work(w) => Ok((0..self.sections[w].len())
                .map(|s| self.section_ref(w, s))
                .collect()),
        }
    }

    async fn text_chunk(&self, reference: &TextRef, language: &str) -> Result<TextChunk> {
        match self.target(&reference.normal)? {
            RefTarget::Section(w, s) => {
                let entry = self.sections[w][s].text.get(language);
                self.to_chunk(&self.works[w].work, language, entry)
            }
            _ => Err(QuireError::Materialization(format!(
                "Text requested for non-section reference {}",
                reference.normal
            ))),
        }
    }

    async fn links_for(&self, segment_ref: &str) -> Result<Vec<Link>> {
        Ok(self.links.get(segment_ref).cloned().unwrap_or_default())
    }

    async fn index_contents(&self, title: &WorkTitle) -> Result<Map<String, Value>> {
        let w = self.work_index(title.as_str())?;
        let entry = &self.works[w];
        let mut index = entry.index.clone().unwrap_or_else(|| {
            let mut index = Map::new();
            index.insert("title".to_string(), Value::from(entry.work.title.as_str()));
            index.insert("heTitle".to_string(), Value::from(entry.work.he_title.clone()));
            index.insert(
                "categories".to_string(),
                Value::from(entry.work.categories.clone()),
            );
            index
        });
        index
            .entry("content_counts")
            .or_insert_with(|| Value::Array(self.content_counts(w)));
        Ok(index)
    }

    async fn toc(&self) -> Result<Value> {
        Ok(self.toc.clone())
    }

    async fn search_toc(&self) -> Result<Value> {
        Ok(self.search_toc.clone())
    }

    async fn text_categories(&self) -> Result<Vec<String>> {
        Ok(self.text_categories.clone())
    }

    async fn hebrew_term(&self, name: &str) -> Result<Option<String>> {
        Ok(self.terms.get(name).cloned())
    }

    async fn people(&self) -> Result<Vec<Value>> {
        Ok(self.people.clone())
    }

    async fn ref_patterns(&self, title: &WorkTitle) -> Result<Vec<String>> {
        self.work_index(title.as_str())?;
        Ok(vec![format!("^{}($|[ ,:])", regex::escape(title.as_str()))])
    }

    async fn resolve_ref(&self, reference: &str) -> Result<TextRef> {
        Ok(self.to_ref(self.target(reference)?))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| QuireError::Resolution(format!("Invalid pattern {p}: {e}")))
        })
        .collect()
}

#[async_trait]
impl HistoryLog for CorpusSnapshot {
    async fn count(&self, query: &HistoryQuery, since: DateTime<Utc>) -> Result<u64> {
        let after = self.history.iter().filter(|h| h.date > since);

        let count = match query {
            HistoryQuery::TextEdits { patterns } => {
                let regexes = compile(patterns)?;
                after
                    .filter(|h| {
                        h.reference
                            .as_deref()
                            .is_some_and(|r| regexes.iter().any(|re| re.is_match(r)))
                    })
                    .count()
            }
            HistoryQuery::OldLinkRefs { patterns } => {
                let regexes = compile(patterns)?;
                after
                    .filter(|h| {
                        h.old_refs
                            .iter()
                            .any(|r| regexes.iter().any(|re| re.is_match(r)))
                    })
                    .count()
            }
            HistoryQuery::NewLinkRefs { patterns } => {
                let regexes = compile(patterns)?;
                after
                    .filter(|h| {
                        h.new_refs
                            .iter()
                            .any(|r| regexes.iter().any(|re| re.is_match(r)))
                    })
                    .count()
            }
            HistoryQuery::IndexEdits { title } => after
                .filter(|h| h.title.as_deref() == Some(title.as_str()))
                .count(),
        };

        Ok(count as u64)
    }
}

#[async_trait]
impl CalendarSource for CorpusSnapshot {
    async fn entries(
        &self,
        cycle: CalendarCycle,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<CalendarRecord>> {
        let mut records: Vec<CalendarRecord> = self
            .calendar
            .get(cycle.key())
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.date >= from && r.date <= until)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}
