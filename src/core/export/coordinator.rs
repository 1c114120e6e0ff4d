//! Export coordinator - main orchestrator for the export process
//!
//! A run moves through fixed stages: catalog structure, per-work export on a
//! bounded worker pool, ancillary catalog artifacts, then a single watermark
//! write which in turn triggers cache invalidation. Works are isolated from
//! each other; a failed work is reported and left out of the watermark while
//! the rest of the run continues.

use super::catalog::CatalogExporter;
use super::layout::{CatalogArtifact, OutputLayout};
use super::summary::{ExportError, ExportSummary};
use super::work::{WorkExporter, WorkReport};
use super::writer::JsonWriter;
use crate::adapters::cdn::PurgeTransport;
use crate::adapters::corpus::{CalendarSource, Corpus, HistoryLog};
use crate::config::QuireConfig;
use crate::core::invalidation::{CacheInvalidator, InvalidationOutcome};
use crate::core::state::{ChangeDetector, WatermarkStore, WriteMode};
use crate::domain::catalog::flatten_titles;
use crate::domain::{CatalogNode, QuireError, Result, WorkTitle};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: QuireConfig,
    corpus: Arc<dyn Corpus>,
    layout: OutputLayout,
    works: WorkExporter,
    catalog: CatalogExporter,
    changes: ChangeDetector,
    watermarks: WatermarkStore,
    invalidator: CacheInvalidator,
    shutdown: watch::Receiver<bool>,
    today: Option<NaiveDate>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// `purger` is `None` when cache invalidation is disabled. Setting the
    /// `shutdown` flag stops the run from starting further works.
    pub fn new(
        config: QuireConfig,
        corpus: Arc<dyn Corpus>,
        history: Arc<dyn HistoryLog>,
        calendar: Arc<dyn CalendarSource>,
        purger: Option<Arc<dyn PurgeTransport>>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let layout = OutputLayout::new(config.export.output_root());
        let writer = JsonWriter::new(config.export.minify_json);
        let invalidator = CacheInvalidator::new(
            purger,
            &config.cdn.public_base_url,
            config.export.schema_version,
        );

        Self {
            works: WorkExporter::new(corpus.clone(), layout.clone(), writer),
            catalog: CatalogExporter::new(
                corpus.clone(),
                calendar,
                writer,
                config.calendar.horizon_days,
            ),
            changes: ChangeDetector::new(corpus.clone(), history),
            watermarks: WatermarkStore::new(
                layout.watermark_path(),
                config.export.schema_version,
                writer,
                invalidator.clone(),
            ),
            invalidator,
            corpus,
            layout,
            config,
            shutdown,
            today: None,
        }
    }

    /// Fix the calendar's notion of today
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn watermarks(&self) -> &WatermarkStore {
        &self.watermarks
    }

    /// Export the whole library
    ///
    /// Clears the output area first unless `skip_existing`, in which case
    /// works that already have an archive are skipped but still recorded in
    /// the fresh watermark.
    ///
    /// # Errors
    ///
    /// Fails only when an artifact outside any single work cannot be
    /// written. Per-work failures are reported in the summary.
    pub async fn export_all(&self, skip_existing: bool) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tracing::info!(
            root = %self.layout.root().display(),
            skip_existing,
            "Starting full export"
        );

        if !skip_existing {
            self.layout.clear().await?;
        }

        summary.catalog_artifacts = self.catalog.export_structure(&self.layout, self.today()).await?;

        let titles = self.catalog_titles().await?;
        summary.total_works = titles.len();

        let (existing, pending): (Vec<WorkTitle>, Vec<WorkTitle>) = titles
            .into_iter()
            .partition(|t| skip_existing && self.layout.archive_path(t).exists());
        summary.skipped_works += existing.len();

        let mut exported = self.run_works(pending, &mut summary).await;
        exported.extend(existing);
        exported.sort();

        self.finish(&mut summary, exported, WriteMode::Overwrite).await?;
        Ok(self.complete(summary, start_time))
    }

    /// Export only works that changed or were added since the last watermark
    ///
    /// Falls back to a full export when there is no watermark.
    pub async fn export_updated(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();

        let Some(watermark) = self.watermarks.load().await? else {
            tracing::info!("No watermark found - running full export");
            return self.export_all(false).await;
        };

        tracing::info!(
            known_titles = watermark.len(),
            schema_version = %watermark.schema_version,
            "Loaded watermark - incremental export"
        );

        let mut titles: BTreeSet<WorkTitle> = self
            .changes
            .list_changed_titles(Some(&watermark))
            .await?
            .unwrap_or_default()
            .into_iter()
            .collect();
        titles.extend(self.changes.list_new_titles(&watermark).await?);

        let mut summary = ExportSummary::new();
        summary.total_works = titles.len();
        summary.catalog_artifacts = self.catalog.export_structure(&self.layout, self.today()).await?;

        let exported = self.run_works(titles.into_iter().collect(), &mut summary).await;
        self.finish(&mut summary, exported, WriteMode::Merge).await?;
        Ok(self.complete(summary, start_time))
    }

    /// Export a single work and merge it into the watermark on success
    pub async fn export_one(&self, title: &WorkTitle) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.total_works = 1;

        let exported = self.run_works(vec![title.clone()], &mut summary).await;
        if !exported.is_empty() {
            summary.set_invalidation(self.watermarks.write(&exported, WriteMode::Merge).await?);
            summary.exported_titles = exported;
        }
        Ok(self.complete(summary, start_time))
    }

    /// Write `toc.json` and `search_toc.json`, then purge the shared artifacts
    pub async fn export_toc(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.catalog_artifacts = self.catalog.export_toc(&self.layout).await?;
        summary.set_invalidation(self.invalidator.invalidate(&[]).await);
        Ok(self.complete(summary, start_time))
    }

    /// Write every catalog artifact into the output root, then purge them
    pub async fn export_catalog(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.catalog_artifacts = self.catalog.export_structure(&self.layout, self.today()).await?;
        summary
            .catalog_artifacts
            .extend(self.catalog.export_ancillary(&self.layout, &self.layout).await?);
        summary.set_invalidation(self.invalidator.invalidate(&[]).await);
        Ok(self.complete(summary, start_time))
    }

    /// Write the catalog artifacts bundled with a client release
    ///
    /// Every directory in `export.sources_paths` receives the catalog
    /// artifacts; package sizes are measured against the main output root.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no sources path is configured.
    pub async fn export_base_files(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        if self.config.export.sources_paths.is_empty() {
            return Err(QuireError::Configuration(
                "export.sources_paths is empty".to_string(),
            ));
        }

        let mut summary = ExportSummary::new();
        for path in &self.config.export.sources_paths {
            let target = OutputLayout::new(path);
            tracing::info!(target = %path, "Writing base files");
            summary
                .catalog_artifacts
                .extend(self.catalog.export_structure(&target, self.today()).await?);
            summary
                .catalog_artifacts
                .extend(self.catalog.export_ancillary(&target, &self.layout).await?);
        }
        Ok(self.complete(summary, start_time))
    }

    /// Refresh the watermark header without stamping any title
    ///
    /// The shared artifacts are still purged.
    pub async fn write_last_updated(&self) -> Result<InvalidationOutcome> {
        self.watermarks.write(&[], WriteMode::Merge).await
    }

    /// Purge the cached URLs of `titles` and of the shared artifacts
    pub async fn invalidate(&self, titles: &[WorkTitle]) -> InvalidationOutcome {
        self.invalidator.invalidate(titles).await
    }

    /// Export works on a bounded pool, returning the titles that succeeded
    ///
    /// No new work starts once shutdown is signalled; works already running
    /// are finished.
    async fn run_works(&self, titles: Vec<WorkTitle>, summary: &mut ExportSummary) -> Vec<WorkTitle> {
        let selected = titles.len();
        let works = &self.works;
        let shutdown = self.shutdown.clone();

        tracing::info!(
            works = selected,
            parallel = self.config.export.parallel_works,
            "Exporting works"
        );

        let results: Vec<(WorkTitle, Result<WorkReport>)> = stream::iter(titles)
            .take_while(move |_| futures::future::ready(!*shutdown.borrow()))
            .map(|title| async move {
                let result = works.export_work(&title).await;
                (title, result)
            })
            .buffer_unordered(self.config.export.parallel_works)
            .collect()
            .await;

        if results.len() < selected {
            summary.interrupted = true;
            tracing::warn!(
                started = results.len(),
                selected,
                "Shutdown requested - remaining works not started"
            );
        }

        let mut succeeded = Vec::with_capacity(results.len());
        for (title, result) in results {
            match result {
                Ok(report) => {
                    summary.succeeded_works += 1;
                    summary.archive_bytes += report.archive_bytes;
                    succeeded.push(title);
                }
                Err(QuireError::Resolution(e)) => {
                    tracing::warn!(title = %title, error = %e, "Skipping work that does not resolve");
                    summary.skipped_works += 1;
                }
                Err(e) => {
                    summary.failed_works += 1;
                    summary.add_error(
                        ExportError::from_error(&e).with_context(format!("title={title}")),
                    );
                }
            }
        }

        succeeded.sort();
        succeeded
    }

    /// Ancillary artifacts, then the watermark barrier and invalidation
    async fn finish(
        &self,
        summary: &mut ExportSummary,
        exported: Vec<WorkTitle>,
        mode: WriteMode,
    ) -> Result<()> {
        if summary.interrupted {
            tracing::warn!("Run interrupted - skipping ancillary catalog artifacts");
        } else {
            let ancillary = self
                .catalog
                .export_ancillary(&self.layout, &self.layout)
                .await?;
            summary.catalog_artifacts.extend(ancillary);
        }

        let outcome = self.watermarks.write(&exported, mode).await?;
        summary.catalog_artifacts.push(CatalogArtifact::LastUpdated);
        summary.set_invalidation(outcome);
        summary.exported_titles = exported;
        Ok(())
    }

    fn complete(&self, summary: ExportSummary, start_time: Instant) -> ExportSummary {
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }

    /// Every work title in the current catalog, once each, in catalog order
    async fn catalog_titles(&self) -> Result<Vec<WorkTitle>> {
        let toc = CatalogNode::parse_tree(&self.corpus.toc().await?);
        let mut seen = BTreeSet::new();
        let mut titles = Vec::new();

        for name in flatten_titles(&toc) {
            if !seen.insert(name.clone()) {
                continue;
            }
            match WorkTitle::new(name.as_str()) {
                Ok(title) => titles.push(title),
                Err(e) => tracing::warn!(title = %name, error = %e, "Skipping invalid catalog title"),
            }
        }
        Ok(titles)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}
