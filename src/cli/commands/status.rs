//! Status command implementation
//!
//! This module implements the `status` command for displaying the watermark
//! and the archives present in the output area.

use crate::config::load_config;
use crate::core::export::{JsonWriter, OutputLayout};
use crate::core::invalidation::CacheInvalidator;
use crate::core::state::WatermarkStore;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show only titles containing this text
    #[arg(long)]
    pub title: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let layout = OutputLayout::new(config.export.output_root());
        let store = WatermarkStore::new(
            layout.watermark_path(),
            config.export.schema_version,
            JsonWriter::new(config.export.minify_json),
            CacheInvalidator::disabled(),
        );

        let watermark = match store.load().await {
            Ok(Some(w)) => w,
            Ok(None) => {
                println!("No export history found in {}.", layout.root().display());
                println!("Run 'quire export-all' to start exporting.");
                return Ok(0);
            }
            Err(e) => {
                println!("❌ Failed to load watermark");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("Watermark: {}", store.path().display());
        println!("  Schema Version: {}", watermark.schema_version);
        println!("  Works Recorded: {}", watermark.len());
        if let Some((oldest, newest)) = watermark.span() {
            println!("  Oldest Export: {}", oldest.format("%Y-%m-%d %H:%M"));
            println!("  Newest Export: {}", newest.format("%Y-%m-%d %H:%M"));
        }
        println!();

        let filtered: Vec<_> = watermark
            .titles
            .iter()
            .filter(|(title, _)| {
                self.title
                    .as_deref()
                    .map_or(true, |needle| title.contains(needle))
            })
            .collect();

        if filtered.is_empty() {
            println!("No works match the specified filter.");
            return Ok(0);
        }

        println!(
            "{:<50} {:<22} {:>14}",
            "Title", "Last Export", "Archive Bytes"
        );
        println!("{}", "-".repeat(88));

        for (title, stamp) in filtered {
            let size = layout.archive_size(title);
            let archive = if size == 0 {
                "missing".to_string()
            } else {
                size.to_string()
            };
            println!("{title:<50} {stamp:<22} {archive:>14}");
        }

        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs { title: None };
        assert!(args.title.is_none());
    }

    #[tokio::test]
    async fn test_status_without_config() {
        let args = StatusArgs {
            title: Some("Gen".to_string()),
        };
        assert_eq!(args.execute("/nonexistent/quire.toml").await.unwrap(), 2);
    }
}
