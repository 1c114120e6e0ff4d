//! Watermark persistence
//!
//! The [`WatermarkStore`] owns `last_updated.json`. Every write is followed
//! by a cache invalidation for exactly the titles just written.

use super::watermark::WatermarkRecord;
use crate::core::export::writer::{write_atomic, JsonWriter};
use crate::core::invalidation::{CacheInvalidator, InvalidationOutcome};
use crate::domain::{QuireError, Result, WorkTitle};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// How a write combines with the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole record
    Overwrite,
    /// Update only the given titles, keeping every other entry
    Merge,
}

/// Loads and writes the watermark record
pub struct WatermarkStore {
    path: PathBuf,
    schema_version: String,
    writer: JsonWriter,
    invalidator: CacheInvalidator,
}

impl WatermarkStore {
    pub fn new(
        path: impl Into<PathBuf>,
        schema_version: u32,
        writer: JsonWriter,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            path: path.into(),
            schema_version: schema_version.to_string(),
            writer,
            invalidator,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record
    ///
    /// Returns `Ok(None)` when no watermark was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<WatermarkRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(QuireError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let record = serde_json::from_slice(&bytes).map_err(|e| {
            QuireError::Serialization(format!("Invalid watermark {}: {}", self.path.display(), e))
        })?;
        Ok(Some(record))
    }

    /// Stamp `titles` with the current minute and invalidate their URLs
    pub async fn write(
        &self,
        titles: &[WorkTitle],
        mode: WriteMode,
    ) -> Result<InvalidationOutcome> {
        self.write_at(titles, mode, Utc::now()).await
    }

    /// Stamp `titles` with `at` and invalidate their URLs
    ///
    /// # Errors
    ///
    /// Returns an error if the existing record cannot be loaded in merge mode
    /// or the new record cannot be written. Invalidation failures are
    /// reported in the outcome.
    pub async fn write_at(
        &self,
        titles: &[WorkTitle],
        mode: WriteMode,
        at: DateTime<Utc>,
    ) -> Result<InvalidationOutcome> {
        let update =
            WatermarkRecord::stamped(self.schema_version.clone(), titles.iter().map(|t| t.as_str()), at);

        let record = match mode {
            WriteMode::Overwrite => update,
            WriteMode::Merge => {
                let mut existing = self
                    .load()
                    .await?
                    .unwrap_or_else(|| WatermarkRecord::empty("0"));
                existing.merge(update);
                existing
            }
        };

        let bytes = self.writer.to_bytes(&record)?;
        write_atomic(&self.path, &bytes).await?;
        tracing::info!(
            path = %self.path.display(),
            mode = ?mode,
            written = titles.len(),
            total = record.len(),
            "Wrote watermark"
        );

        Ok(self.invalidator.invalidate(titles).await)
    }
}
