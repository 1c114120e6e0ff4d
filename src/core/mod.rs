//! Core business logic for Quire.
//!
//! This module contains the export pipeline and its run-level state.
//!
//! # Modules
//!
//! - [`export`] - Work and catalog export, packaging, and run coordination
//! - [`state`] - The watermark record and change detection for incremental runs
//! - [`invalidation`] - CDN cache purging after watermark writes
//! - [`verification`] - Checksums of written documents
//!
//! # Export Workflow
//!
//! 1. **Load State**: Read `last_updated.json`, if any
//! 2. **Select**: Every work, or only changed and newly added ones
//! 3. **Catalog**: Write the table of contents, calendar and category names
//! 4. **Export**: Materialize each work's documents and package them as a ZIP
//! 5. **Ancillary**: Write people and package descriptors
//! 6. **Checkpoint**: Stamp the exported works in the watermark
//! 7. **Invalidate**: Purge the affected public URLs
//!
//! # Example
//!
//! ```rust,no_run
//! use quire::adapters::corpus::CorpusSnapshot;
//! use quire::config::load_config;
//! use quire::core::export::ExportCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quire.toml")?;
//! let corpus = Arc::new(CorpusSnapshot::load(&config.corpus.snapshot_path).await?);
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(
//!     config,
//!     corpus.clone(),
//!     corpus.clone(),
//!     corpus,
//!     None,
//!     shutdown_rx,
//! );
//!
//! let summary = coordinator.export_updated().await?;
//! println!("Exported {} works", summary.succeeded_works);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod invalidation;
pub mod state;
pub mod verification;
