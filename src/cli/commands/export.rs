//! Export command implementations
//!
//! This module implements the `export-all`, `export-one` and
//! `export-updated` commands.

use super::{prepare_coordinator, report_summary};
use crate::domain::WorkTitle;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export-all command
#[derive(Args, Debug)]
pub struct ExportAllArgs {
    /// Keep the output area and skip works whose archive already exists
    #[arg(long)]
    pub skip_existing: bool,
}

impl ExportAllArgs {
    /// Execute the export-all command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(skip_existing = self.skip_existing, "Starting export-all command");

        let coordinator = match prepare_coordinator(config_path, shutdown_signal).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        println!("🚀 Starting full export...");
        match coordinator.export_all(self.skip_existing).await {
            Ok(summary) => Ok(report_summary(&summary)),
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}

/// Arguments for the export-one command
#[derive(Args, Debug)]
pub struct ExportOneArgs {
    /// Title of the work to export
    pub title: String,
}

impl ExportOneArgs {
    /// Execute the export-one command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(title = %self.title, "Starting export-one command");

        let title = match WorkTitle::new(self.title.as_str()) {
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

        println!("🚀 Exporting {title}...");
        match coordinator.export_one(&title).await {
            Ok(summary) => Ok(report_summary(&summary)),
            Err(e) => {
                tracing::error!(error = %e, title = %title, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}

/// Arguments for the export-updated command
#[derive(Args, Debug)]
pub struct ExportUpdatedArgs {}

impl ExportUpdatedArgs {
    /// Execute the export-updated command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export-updated command");

        let coordinator = match prepare_coordinator(config_path, shutdown_signal).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        println!("🚀 Starting incremental export...");
        match coordinator.export_updated().await {
            Ok(summary) => Ok(report_summary(&summary)),
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}
