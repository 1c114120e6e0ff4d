//! Catalog command implementations
//!
//! This module implements `export-toc`, `export-catalog` and
//! `export-base-files`. None of them touch works or the watermark.

use super::{prepare_coordinator, report_summary};
use crate::core::export::ExportSummary;
use crate::domain::Result;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export-toc command
#[derive(Args, Debug)]
pub struct ExportTocArgs {}

impl ExportTocArgs {
    /// Execute the export-toc command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export-toc command");
        run(config_path, shutdown_signal, Target::Toc).await
    }
}

/// Arguments for the export-catalog command
#[derive(Args, Debug)]
pub struct ExportCatalogArgs {}

impl ExportCatalogArgs {
    /// Execute the export-catalog command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export-catalog command");
        run(config_path, shutdown_signal, Target::Catalog).await
    }
}

/// Arguments for the export-base-files command
#[derive(Args, Debug)]
pub struct ExportBaseFilesArgs {}

impl ExportBaseFilesArgs {
    /// Execute the export-base-files command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export-base-files command");
        run(config_path, shutdown_signal, Target::BaseFiles).await
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Toc,
    Catalog,
    BaseFiles,
}

async fn run(
    config_path: &str,
    shutdown_signal: watch::Receiver<bool>,
    target: Target,
) -> anyhow::Result<i32> {
    let coordinator = match prepare_coordinator(config_path, shutdown_signal).await {
        Ok(c) => c,
        Err(code) => return Ok(code),
    };

    let result: Result<ExportSummary> = match target {
        Target::Toc => coordinator.export_toc().await,
        Target::Catalog => coordinator.export_catalog().await,
        Target::BaseFiles => coordinator.export_base_files().await,
    };

    match result {
        Ok(summary) => {
            for artifact in &summary.catalog_artifacts {
                println!("  📄 {}", artifact.file_name());
            }
            Ok(report_summary(&summary))
        }
        Err(e) => {
            tracing::error!(error = %e, target = ?target, "Catalog export failed");
            eprintln!("Catalog export failed: {e}");
            Ok(if matches!(e, crate::domain::QuireError::Configuration(_)) {
                2
            } else {
                5
            })
        }
    }
}
