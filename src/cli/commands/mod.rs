//! CLI command implementations
//!
//! This module contains all CLI command implementations and the setup they
//! share: loading configuration, opening the corpus and printing summaries.
//!
//! Exit codes: 0 run completed (per-work failures are reported, not fatal),
//! 1 cache purge command failed, 2 configuration error, 4 corpus or CDN
//! initialization error, 5 fatal error, 130 interrupted.

pub mod cache;
pub mod catalog;
pub mod export;
pub mod status;
pub mod validate;

use crate::adapters::corpus::CorpusSnapshot;
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::core::invalidation::purger_from_config;
use std::sync::Arc;
use tokio::sync::watch;

/// Build a coordinator from the configuration file, or the exit code to stop with
pub(crate) async fn prepare_coordinator(
    config_path: &str,
    shutdown_signal: watch::Receiver<bool>,
) -> Result<ExportCoordinator, i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Configuration error: {e}");
            return Err(2);
        }
    };

    let purger = match purger_from_config(&config.cdn) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create CDN purger");
            eprintln!("Failed to initialize CDN purge: {e}");
            return Err(4);
        }
    };

    let corpus = match CorpusSnapshot::load(&config.corpus.snapshot_path).await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!(error = %e, path = %config.corpus.snapshot_path, "Failed to open corpus");
            eprintln!("Failed to open corpus: {e}");
            return Err(4);
        }
    };

    Ok(ExportCoordinator::new(
        config,
        corpus.clone(),
        corpus.clone(),
        corpus,
        purger,
        shutdown_signal,
    ))
}

/// Print a run summary and map it to an exit code
pub(crate) fn report_summary(summary: &ExportSummary) -> i32 {
    println!();
    println!("📊 Export Summary:");
    println!("  Works Selected: {}", summary.total_works);
    println!("  Exported: {}", summary.succeeded_works);
    println!("  Failed: {}", summary.failed_works);
    println!("  Skipped: {}", summary.skipped_works);
    println!("  Catalog Artifacts: {}", summary.catalog_artifacts.len());
    println!("  Archive Bytes: {}", summary.archive_bytes);
    if let Some(outcome) = &summary.invalidation {
        println!("  Cache Invalidation: {outcome}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }

    if summary.interrupted {
        println!("⚠️  Export interrupted. Completed works were recorded in the watermark.");
        println!("   Run 'quire export-updated' to pick up the rest.");
        tracing::info!("Export interrupted by user signal");
        130
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else if summary.failed_works > 0 {
        println!("⚠️  Export completed with failures");
        0
    } else {
        println!("✅ Export completed!");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::{ExportError, ExportErrorType};
    use crate::core::invalidation::InvalidationOutcome;

    #[test]
    fn test_report_summary_exit_codes() {
        let mut summary = ExportSummary::new();
        summary.succeeded_works = 3;
        assert_eq!(report_summary(&summary), 0);

        summary.set_invalidation(InvalidationOutcome::Failed {
            error: "timeout".to_string(),
        });
        assert_eq!(report_summary(&summary), 0);

        summary.failed_works = 1;
        summary.add_error(ExportError::new(
            ExportErrorType::Materialization,
            "bad chunk".to_string(),
        ));
        assert_eq!(report_summary(&summary), 0);

        summary.interrupted = true;
        assert_eq!(report_summary(&summary), 130);
    }

    #[tokio::test]
    async fn test_missing_config_is_a_configuration_error() {
        let (_tx, rx) = watch::channel(false);
        let result = prepare_coordinator("/nonexistent/quire.toml", rx).await;
        assert!(matches!(result, Err(2)));
    }
}
