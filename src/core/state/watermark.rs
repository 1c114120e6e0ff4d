//! Watermark record
//!
//! `last_updated.json` maps every exported work title to the minute it was
//! last exported. Incremental runs compare corpus history against these
//! timestamps.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Timestamp format of watermark entries, e.g. `2025-01-05T00:42:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Persisted per-title export timestamps
///
/// # Examples
///
/// ```
/// use quire::core::state::WatermarkRecord;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 5, 0, 42, 31).unwrap();
/// let record = WatermarkRecord::stamped("4", ["Genesis"], at);
/// assert_eq!(record.titles["Genesis"], "2025-01-05T00:42:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkRecord {
    /// Bundle format version; older files stored it as a number
    #[serde(deserialize_with = "string_or_number")]
    pub schema_version: String,

    #[serde(default)]
    pub comment: String,

    /// Work title to last export timestamp
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
}

impl WatermarkRecord {
    /// An empty record, as if no work had ever been exported
    pub fn empty(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            comment: String::new(),
            titles: BTreeMap::new(),
        }
    }

    /// A record stamping every title with `at`, truncated to the minute
    pub fn stamped<I, S>(schema_version: impl Into<String>, titles: I, at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stamp = format_timestamp(at);
        Self {
            schema_version: schema_version.into(),
            comment: String::new(),
            titles: titles
                .into_iter()
                .map(|t| (t.into(), stamp.clone()))
                .collect(),
        }
    }

    /// Merge an update into this record
    ///
    /// Schema version and comment are taken from the update; only titles
    /// present in the update change their timestamp.
    pub fn merge(&mut self, update: WatermarkRecord) {
        self.schema_version = update.schema_version;
        self.comment = update.comment;
        self.titles.extend(update.titles);
    }

    /// Parsed timestamp of a title
    pub fn last_exported(&self, title: &str) -> Option<DateTime<Utc>> {
        self.titles.get(title).and_then(|t| parse_timestamp(t))
    }

    /// Earliest and latest timestamps in the record
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut stamps = self.titles.values().filter_map(|t| parse_timestamp(t));
        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Format a timestamp truncated to the minute
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    let truncated = at
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at);
    truncated.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a watermark timestamp
///
/// Accepts the native format as well as RFC 3339 strings.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
