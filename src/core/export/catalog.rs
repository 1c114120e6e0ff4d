//! Whole-library artifacts
//!
//! The catalog exporter writes the artifacts that do not belong to any single
//! work. Each write replaces the previous artifact atomically, so every
//! export here can be repeated at will.

use super::calendar::build_calendar;
use super::layout::{CatalogArtifact, OutputLayout};
use super::packages::build_packages;
use super::writer::JsonWriter;
use crate::adapters::corpus::{CalendarSource, Corpus};
use crate::domain::catalog::tree_to_value;
use crate::domain::{CatalogNode, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Writes catalog artifacts into an output root
#[derive(Clone)]
pub struct CatalogExporter {
    corpus: Arc<dyn Corpus>,
    calendar: Arc<dyn CalendarSource>,
    writer: JsonWriter,
    horizon_days: u32,
}

impl CatalogExporter {
    pub fn new(
        corpus: Arc<dyn Corpus>,
        calendar: Arc<dyn CalendarSource>,
        writer: JsonWriter,
        horizon_days: u32,
    ) -> Self {
        Self {
            corpus,
            calendar,
            writer,
            horizon_days,
        }
    }

    /// Artifacts describing library structure, written before any work
    ///
    /// Table of contents, search toc, calendar and category translations.
    pub async fn export_structure(
        &self,
        target: &OutputLayout,
        today: NaiveDate,
    ) -> Result<Vec<CatalogArtifact>> {
        let mut written = self.export_toc(target).await?;
        written.push(self.export_calendar(target, today).await?);
        written.push(self.export_hebrew_categories(target).await?);
        Ok(written)
    }

    /// Artifacts derived from exported works, written after them
    ///
    /// Package sizes are measured against the archives in `archives`.
    pub async fn export_ancillary(
        &self,
        target: &OutputLayout,
        archives: &OutputLayout,
    ) -> Result<Vec<CatalogArtifact>> {
        Ok(vec![
            self.export_people(target).await?,
            self.export_packages(target, archives).await?,
        ])
    }

    /// Write `toc.json` and `search_toc.json`, both normalized
    pub async fn export_toc(&self, target: &OutputLayout) -> Result<Vec<CatalogArtifact>> {
        let toc = CatalogNode::parse_tree(&self.corpus.toc().await?);
        self.write(target, CatalogArtifact::Toc, &tree_to_value(&toc))
            .await?;

        let search_toc = CatalogNode::parse_tree(&self.corpus.search_toc().await?);
        self.write(target, CatalogArtifact::SearchToc, &tree_to_value(&search_toc))
            .await?;

        Ok(vec![CatalogArtifact::Toc, CatalogArtifact::SearchToc])
    }

    /// Write the English to Hebrew category name map
    ///
    /// Categories without a Hebrew term are left out.
    pub async fn export_hebrew_categories(&self, target: &OutputLayout) -> Result<CatalogArtifact> {
        let mut categories = Map::new();
        for name in self.corpus.text_categories().await? {
            match self.corpus.hebrew_term(&name).await? {
                Some(hebrew) => {
                    categories.insert(name, Value::String(hebrew));
                }
                None => {
                    tracing::warn!(category = %name, "No Hebrew term for category, skipping");
                }
            }
        }

        self.write(target, CatalogArtifact::HebrewCategories, &categories)
            .await?;
        Ok(CatalogArtifact::HebrewCategories)
    }

    /// Write the lower-cased people name index
    pub async fn export_people(&self, target: &OutputLayout) -> Result<CatalogArtifact> {
        let people: BTreeMap<String, u8> = self
            .corpus
            .people()
            .await?
            .iter()
            .filter_map(Value::as_str)
            .map(|name| (name.to_lowercase(), 1))
            .collect();

        self.write(target, CatalogArtifact::People, &people).await?;
        Ok(CatalogArtifact::People)
    }

    /// Write the daily reading calendar starting yesterday
    pub async fn export_calendar(
        &self,
        target: &OutputLayout,
        today: NaiveDate,
    ) -> Result<CatalogArtifact> {
        let calendar = build_calendar(
            self.corpus.as_ref(),
            self.calendar.as_ref(),
            today,
            self.horizon_days,
        )
        .await?;

        self.write(target, CatalogArtifact::Calendar, &calendar)
            .await?;
        Ok(CatalogArtifact::Calendar)
    }

    /// Write download package descriptors
    pub async fn export_packages(
        &self,
        target: &OutputLayout,
        archives: &OutputLayout,
    ) -> Result<CatalogArtifact> {
        let toc = CatalogNode::parse_tree(&self.corpus.toc().await?);
        let packages = build_packages(&toc, archives);

        self.write(target, CatalogArtifact::Packages, &packages)
            .await?;
        Ok(CatalogArtifact::Packages)
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        target: &OutputLayout,
        artifact: CatalogArtifact,
        value: &T,
    ) -> Result<()> {
        let path = target.artifact_path(artifact);
        self.writer.write(value, &path).await?;
        tracing::info!(artifact = artifact.file_name(), path = %path.display(), "Wrote catalog artifact");
        Ok(())
    }
}
