//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! rotating JSON log files.
//!
//! # Example
//!
//! ```no_run
//! use quire::logging::init_logging;
//! use quire::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(title = "Genesis", "Exporting work");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a work export
///
/// # Example
///
/// ```no_run
/// use quire::log_work_start;
/// use quire::domain::WorkTitle;
///
/// let title = WorkTitle::new("Genesis").unwrap();
/// log_work_start!(&title);
/// ```
#[macro_export]
macro_rules! log_work_start {
    ($title:expr) => {
        tracing::info!(title = %$title, "Exporting work");
    };
}

/// Log the completion of a work export
///
/// # Example
///
/// ```no_run
/// use quire::log_work_complete;
/// use std::time::Duration;
///
/// log_work_complete!("Genesis", 50, Duration::from_millis(420));
/// ```
#[macro_export]
macro_rules! log_work_complete {
    ($title:expr, $documents:expr, $duration:expr) => {
        tracing::info!(
            title = %$title,
            documents = $documents,
            duration_ms = $duration.as_millis() as u64,
            "Work exported"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use quire::log_error_with_context;
/// use quire::domain::QuireError;
///
/// let error = QuireError::Persistence("disk full".to_string());
/// log_error_with_context!(&error, "Failed to write toc.json");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
