//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use super::layout::CatalogArtifact;
use crate::core::invalidation::InvalidationOutcome;
use crate::domain::{QuireError, WorkTitle};
use std::time::Duration;

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of works selected for the run
    pub total_works: usize,

    /// Number of works exported and packaged
    pub succeeded_works: usize,

    /// Number of works that failed
    pub failed_works: usize,

    /// Number of works skipped because their archive already existed
    pub skipped_works: usize,

    /// Works recorded in the watermark by this run
    pub exported_titles: Vec<WorkTitle>,

    /// Catalog artifacts written
    pub catalog_artifacts: Vec<CatalogArtifact>,

    /// Total size of archives written by this run
    pub archive_bytes: u64,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Result of the cache purge, if the run reached it
    pub invalidation: Option<InvalidationOutcome>,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            total_works: 0,
            succeeded_works: 0,
            failed_works: 0,
            skipped_works: 0,
            exported_titles: Vec::new(),
            catalog_artifacts: Vec::new(),
            archive_bytes: 0,
            errors: Vec::new(),
            invalidation: None,
            interrupted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Record the invalidation outcome, adding an error if the purge failed
    pub fn set_invalidation(&mut self, outcome: InvalidationOutcome) {
        if let InvalidationOutcome::Failed { error } = &outcome {
            self.add_error(ExportError::new(ExportErrorType::Invalidation, error.clone()));
        }
        self.invalidation = Some(outcome);
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.failed_works == 0 && self.errors.is_empty() && !self.interrupted
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.succeeded_works + self.failed_works;
        if attempted == 0 {
            return 100.0;
        }
        (self.succeeded_works as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total_works,
            succeeded = self.succeeded_works,
            failed = self.failed_works,
            skipped = self.skipped_works,
            catalog_artifacts = self.catalog_artifacts.len(),
            archive_bytes = self.archive_bytes,
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if let Some(outcome) = &self.invalidation {
            tracing::info!(outcome = %outcome, "Cache invalidation");
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// A title or reference did not resolve
    Resolution,
    /// Content could not be fetched or rendered
    Materialization,
    /// A catalog artifact could not be built
    Catalog,
    /// An artifact could not be written
    Persistence,
    /// The CDN purge failed
    Invalidation,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

impl From<&QuireError> for ExportErrorType {
    fn from(err: &QuireError) -> Self {
        match err {
            QuireError::Resolution(_) => ExportErrorType::Resolution,
            QuireError::Materialization(_)
            | QuireError::Serialization(_)
            | QuireError::Packaging(_) => ExportErrorType::Materialization,
            QuireError::Catalog(_) => ExportErrorType::Catalog,
            QuireError::Persistence(_) | QuireError::Io(_) => ExportErrorType::Persistence,
            QuireError::Cdn(_) => ExportErrorType::Invalidation,
            QuireError::Configuration(_) => ExportErrorType::Configuration,
            QuireError::Other(_) => ExportErrorType::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., work title)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Classify a domain error
    pub fn from_error(err: &QuireError) -> Self {
        Self::new(ExportErrorType::from(err), err.to_string())
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}
