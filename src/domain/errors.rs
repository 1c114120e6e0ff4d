//! Domain error types
//!
//! This module defines the error hierarchy for Quire. Variants follow the
//! failure taxonomy of the export pipeline so that callers can decide, by
//! variant, whether a failure is recovered locally, at work granularity, or
//! surfaced to the operator. Third-party error types are converted to strings
//! at the boundary and never leak through the public API.

use thiserror::Error;

/// Main Quire error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum QuireError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A title or reference string does not map to a known work
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Backing-store fetch failure or malformed content for one work
    #[error("Materialization error: {0}")]
    Materialization(String),

    /// Malformed node in the catalog tree
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Failure writing an artifact to the output area
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Failure building a work archive
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// Cache invalidation errors
    #[error("CDN error: {0}")]
    Cdn(#[from] CdnError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// CDN purge transport errors
///
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum CdnError {
    /// Purge is enabled but credentials or zone are missing
    #[error("CDN purge is not configured: {0}")]
    NotConfigured(String),

    /// Failed to reach the purge endpoint
    #[error("Failed to connect to CDN API: {0}")]
    ConnectionFailed(String),

    /// The purge endpoint rejected the request
    #[error("Purge rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The purge endpoint answered 2xx but reported failure in its body
    #[error("Purge unsuccessful: {0}")]
    Unsuccessful(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl QuireError {
    /// Whether this error is scoped to a single work and must not abort a run
    pub fn is_work_scoped(&self) -> bool {
        matches!(
            self,
            QuireError::Resolution(_)
                | QuireError::Materialization(_)
                | QuireError::Serialization(_)
                | QuireError::Packaging(_)
        )
    }
}

impl From<std::io::Error> for QuireError {
    fn from(err: std::io::Error) -> Self {
        QuireError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(err: serde_json::Error) -> Self {
        QuireError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for QuireError {
    fn from(err: toml::de::Error) -> Self {
        QuireError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for QuireError {
    fn from(err: zip::result::ZipError) -> Self {
        QuireError::Packaging(err.to_string())
    }
}
