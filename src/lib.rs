// Quire - Corpus to offline bundle exporter
// Copyright (c) 2025 Quire Contributors
// Licensed under the MIT License

//! # Quire - Corpus to offline bundle exporter
//!
//! Quire exports a multilingual text corpus into static JSON documents packaged
//! as one ZIP archive per work, together with the catalog artifacts an offline
//! reader needs. Runs are incremental: a watermark file records when each work
//! was last exported and only works touched since then are rebuilt.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** default text versions per language for each work
//! - **Materializing** section documents with text, links and attribution
//! - **Packaging** each work's documents into a deterministic ZIP archive
//! - **Cataloging** the table of contents, calendar, people and packages
//! - **Tracking** per-work export timestamps for incremental runs
//! - **Invalidating** the CDN cache for everything a run republished
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export, state, invalidation)
//! - [`adapters`] - External integrations (corpus snapshot, CDN purge API)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire::adapters::corpus::CorpusSnapshot;
//! use quire::config::load_config;
//! use quire::core::export::ExportCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("quire.toml")?;
//!     let corpus = Arc::new(CorpusSnapshot::load(&config.corpus.snapshot_path).await?);
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//!     let coordinator =
//!         ExportCoordinator::new(config, corpus.clone(), corpus.clone(), corpus, None, shutdown);
//!     let summary = coordinator.export_all(false).await?;
//!
//!     println!("Exported {} works", summary.succeeded_works);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Quire uses the [`domain::QuireError`] type for all errors. Failures inside a
//! single work are recorded in the run summary; only failures that affect the
//! whole output area end a run.
//!
//! ## Logging
//!
//! Quire uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(title = "Genesis", documents = 50, "Work exported");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
