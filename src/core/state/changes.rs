//! Change detection
//!
//! Decides which works need re-export by asking the corpus history log
//! whether anything touching a work happened after its watermark.

use super::watermark::WatermarkRecord;
use crate::adapters::corpus::{Corpus, HistoryLog, HistoryQuery};
use crate::domain::catalog::flatten_titles;
use crate::domain::{CatalogNode, QuireError, Result, WorkTitle};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Finds changed and newly added works
#[derive(Clone)]
pub struct ChangeDetector {
    corpus: Arc<dyn Corpus>,
    history: Arc<dyn HistoryLog>,
}

impl ChangeDetector {
    pub fn new(corpus: Arc<dyn Corpus>, history: Arc<dyn HistoryLog>) -> Self {
        Self { corpus, history }
    }

    /// Titles of the watermark that changed since their timestamp
    ///
    /// Returns `None` when there is no watermark, meaning everything must be
    /// exported. Titles that are not valid work titles are skipped.
    pub async fn list_changed_titles(
        &self,
        watermark: Option<&WatermarkRecord>,
    ) -> Result<Option<Vec<WorkTitle>>> {
        let Some(watermark) = watermark else {
            return Ok(None);
        };

        let mut changed = Vec::new();
        for (name, stamp) in &watermark.titles {
            let title = match WorkTitle::new(name.as_str()) {
                Ok(title) => title,
                Err(e) => {
                    tracing::warn!(title = %name, error = %e, "Skipping invalid title in watermark");
                    continue;
                }
            };

            let updated = match watermark.last_exported(name) {
                Some(since) => self.has_updated(&title, since).await?,
                None => {
                    tracing::warn!(title = %name, stamp = %stamp, "Unreadable watermark timestamp, treating work as changed");
                    true
                }
            };
            if updated {
                changed.push(title);
            }
        }

        tracing::info!(checked = watermark.len(), changed = changed.len(), "Detected changed works");
        Ok(Some(changed))
    }

    /// Whether anything touching `title` was recorded after `since`
    ///
    /// A title that no longer resolves is reported as unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the history log cannot be queried.
    pub async fn has_updated(&self, title: &WorkTitle, since: DateTime<Utc>) -> Result<bool> {
        let patterns = match self.corpus.ref_patterns(title).await {
            Ok(patterns) => patterns,
            Err(QuireError::Resolution(e)) => {
                tracing::warn!(title = %title, error = %e, "Cannot resolve title, treating as unchanged");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let queries = [
            HistoryQuery::TextEdits {
                patterns: patterns.clone(),
            },
            HistoryQuery::OldLinkRefs {
                patterns: patterns.clone(),
            },
            HistoryQuery::NewLinkRefs { patterns },
            HistoryQuery::IndexEdits {
                title: title.clone(),
            },
        ];

        for query in &queries {
            let count = self.history.count(query, since).await?;
            if count > 0 {
                tracing::debug!(title = %title, query = ?query, count, "Work changed");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Titles in the current catalog that the watermark has never seen
    pub async fn list_new_titles(&self, watermark: &WatermarkRecord) -> Result<Vec<WorkTitle>> {
        let toc = CatalogNode::parse_tree(&self.corpus.toc().await?);
        let mut seen = HashSet::new();
        let mut added = Vec::new();

        for name in flatten_titles(&toc) {
            if watermark.contains(&name) || !seen.insert(name.clone()) {
                continue;
            }
            match WorkTitle::new(name.as_str()) {
                Ok(title) => added.push(title),
                Err(e) => tracing::warn!(title = %name, error = %e, "Skipping invalid catalog title"),
            }
        }

        tracing::info!(added = added.len(), "Detected new works");
        Ok(added)
    }
}
