//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Quire configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates every section
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Corpus Snapshot: {}", config.corpus.snapshot_path);
        println!("  Output Root: {}", config.export.output_root().display());
        println!("  Schema Version: {}", config.export.schema_version);
        println!("  Minify JSON: {}", config.export.minify_json);
        println!("  Parallel Works: {}", config.export.parallel_works);
        if !config.export.sources_paths.is_empty() {
            println!("  Sources Paths: {:?}", config.export.sources_paths);
        }
        println!("  Calendar Horizon: {} days", config.calendar.horizon_days);
        if config.cdn.enabled {
            println!("  CDN Purge: enabled ({})", config.cdn.public_base_url);
        } else {
            println!("  CDN Purge: disabled");
        }
        println!();
        Ok(0)
    }
}
