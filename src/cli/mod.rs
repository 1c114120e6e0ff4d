//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Quire using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Quire - Corpus to offline bundle exporter
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(version, about, long_about = None)]
#[command(author = "Quire Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "quire.toml", env = "QUIRE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QUIRE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every work and rewrite the watermark
    ExportAll(commands::export::ExportAllArgs),

    /// Export a single work and merge it into the watermark
    ExportOne(commands::export::ExportOneArgs),

    /// Export works changed or added since the last watermark
    ExportUpdated(commands::export::ExportUpdatedArgs),

    /// Write the table of contents and search toc
    ExportToc(commands::catalog::ExportTocArgs),

    /// Write every catalog artifact
    ExportCatalog(commands::catalog::ExportCatalogArgs),

    /// Write catalog artifacts into the configured sources paths
    ExportBaseFiles(commands::catalog::ExportBaseFilesArgs),

    /// Purge cached URLs for the given works and all shared artifacts
    InvalidateCache(commands::cache::InvalidateCacheArgs),

    /// Refresh the watermark header and purge shared artifacts
    WriteLastUpdated(commands::cache::WriteLastUpdatedArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the watermark and output area status
    Status(commands::status::StatusArgs),
}
