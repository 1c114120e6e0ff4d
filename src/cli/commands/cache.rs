//! Cache maintenance commands
//!
//! `invalidate-cache` purges URLs without writing anything.
//! `write-last-updated` refreshes the watermark header, which purges the
//! shared artifacts.

use super::prepare_coordinator;
use crate::core::invalidation::InvalidationOutcome;
use crate::domain::WorkTitle;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the invalidate-cache command
#[derive(Args, Debug)]
pub struct InvalidateCacheArgs {
    /// Titles whose archive and index document are purged
    pub titles: Vec<String>,
}

impl InvalidateCacheArgs {
    /// Execute the invalidate-cache command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(titles = self.titles.len(), "Starting invalidate-cache command");

        let titles = match self
            .titles
            .iter()
            .map(|t| WorkTitle::new(t.as_str()))
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Invalid title: {e}");
                return Ok(2);
            }
        };

        let coordinator = match prepare_coordinator(config_path, shutdown_signal).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        Ok(report_outcome(&coordinator.invalidate(&titles).await))
    }
}

/// Arguments for the write-last-updated command
#[derive(Args, Debug)]
pub struct WriteLastUpdatedArgs {}

impl WriteLastUpdatedArgs {
    /// Execute the write-last-updated command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting write-last-updated command");

        let coordinator = match prepare_coordinator(config_path, shutdown_signal).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        match coordinator.write_last_updated().await {
            Ok(outcome) => {
                println!(
                    "✅ Wrote {}",
                    coordinator.watermarks().path().display()
                );
                Ok(report_outcome(&outcome))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to write watermark");
                eprintln!("Failed to write watermark: {e}");
                Ok(5)
            }
        }
    }
}

fn report_outcome(outcome: &InvalidationOutcome) -> i32 {
    match outcome {
        InvalidationOutcome::Disabled => {
            println!("ℹ️  Cache invalidation is disabled");
            0
        }
        InvalidationOutcome::Purged { count } => {
            println!("✅ Purged {count} URLs");
            0
        }
        InvalidationOutcome::Failed { error } => {
            println!("❌ Cache purge failed: {error}");
            1
        }
    }
}
