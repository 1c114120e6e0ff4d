//! Per-work export
//!
//! Materializes every document of one work into the work's own scratch
//! directory, adds the index document and packages the lot into
//! `{title}.zip`. Works never share a scratch directory, so any number of
//! them can be exported at once.

use super::layout::{document_file_name, OutputLayout};
use super::package::package_directory;
use super::section::SectionMaterializer;
use super::versions::{resolve_defaults, DefaultVersions};
use super::writer::JsonWriter;
use crate::adapters::corpus::Corpus;
use crate::domain::{
    AttributionFields, AttributionSide, GroupedDocument, QuireError, Result, TopLevelDocument,
    WorkTitle, PRIMARY_LANGUAGE, TRANSLATION_LANGUAGE,
};
use crate::{log_error_with_context, log_work_complete, log_work_start};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of one successfully exported work
#[derive(Debug, Clone)]
pub struct WorkReport {
    pub title: WorkTitle,

    /// Number of documents packaged, including the index document
    pub documents: usize,

    pub archive_bytes: u64,

    /// SHA-256 of each packaged document, keyed by file name
    pub checksums: BTreeMap<String, String>,

    pub duration: Duration,
}

/// Exports single works
#[derive(Clone)]
pub struct WorkExporter {
    corpus: Arc<dyn Corpus>,
    materializer: SectionMaterializer,
    layout: OutputLayout,
    writer: JsonWriter,
}

impl WorkExporter {
    pub fn new(corpus: Arc<dyn Corpus>, layout: OutputLayout, writer: JsonWriter) -> Self {
        Self {
            materializer: SectionMaterializer::new(corpus.clone()),
            corpus,
            layout,
            writer,
        }
    }

    /// Export one work into `{title}.zip`
    ///
    /// Either the whole work is packaged or the call fails and the previous
    /// archive, if any, stays untouched. The scratch directory is removed in
    /// both cases.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while materializing, writing or
    /// packaging any part of the work.
    pub async fn export_work(&self, title: &WorkTitle) -> Result<WorkReport> {
        let start = Instant::now();
        log_work_start!(title);

        let scratch = self.layout.scratch_dir(title);
        let result = self.export_into(title, &scratch).await;
        remove_scratch(&scratch).await;

        match result {
            Ok((checksums, archive_bytes)) => {
                let report = WorkReport {
                    title: title.clone(),
                    documents: checksums.len(),
                    archive_bytes,
                    checksums,
                    duration: start.elapsed(),
                };
                log_work_complete!(title, report.documents, report.duration);
                Ok(report)
            }
            Err(e) => {
                let context = format!("Failed to export work {title}");
                log_error_with_context!(&e, context.as_str());
                Err(e)
            }
        }
    }

    async fn export_into(
        &self,
        title: &WorkTitle,
        scratch: &Path,
    ) -> Result<(BTreeMap<String, String>, u64)> {
        remove_scratch(scratch).await;
        tokio::fs::create_dir_all(scratch).await.map_err(|e| {
            QuireError::Persistence(format!("Failed to create {}: {}", scratch.display(), e))
        })?;

        let work = self.corpus.work(title).await?;
        let defaults = resolve_defaults(&work);
        let mut checksums = BTreeMap::new();

        for top in self.corpus.top_section_refs(title).await? {
            let document = if top.is_section_level {
                TopLevelDocument::Section(self.materializer.materialize(&top, &defaults).await?)
            } else {
                let mut sections = Vec::new();
                for section in self.corpus.section_refs(&top).await? {
                    sections.push(self.materializer.materialize(&section, &defaults).await?);
                }
                TopLevelDocument::Group(GroupedDocument {
                    reference: top.normal.clone(),
                    sections,
                })
            };

            let name = document_file_name(document.reference());
            let checksum = self.writer.write(&document, &scratch.join(&name)).await?;
            checksums.insert(name, checksum);
        }

        let index = self.index_document(title, &defaults).await?;
        let name = title.index_document_name();
        let checksum = self.writer.write(&index, &scratch.join(&name)).await?;
        checksums.insert(name, checksum);

        let source = scratch.to_path_buf();
        let archive = self.layout.archive_path(title);
        let archive_bytes = tokio::task::spawn_blocking(move || package_directory(&source, &archive))
            .await
            .map_err(|e| QuireError::Packaging(format!("Packaging task failed: {e}")))??;

        Ok((checksums, archive_bytes))
    }

    /// The work's index record plus the attribution of its default versions
    async fn index_document(
        &self,
        title: &WorkTitle,
        defaults: &DefaultVersions,
    ) -> Result<Map<String, Value>> {
        let mut index = self.corpus.index_contents(title).await?;

        let mut attribution = AttributionFields::default();
        for language in [TRANSLATION_LANGUAGE, PRIMARY_LANGUAGE] {
            if let (Some(side), Some(version)) =
                (AttributionSide::for_language(language), defaults.get(language))
            {
                attribution.apply_version(side, version);
            }
        }

        if let Value::Object(fields) = serde_json::to_value(&attribution)? {
            index.extend(fields);
        }
        Ok(index)
    }
}

async fn remove_scratch(scratch: &Path) {
    match tokio::fs::remove_dir_all(scratch).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %scratch.display(), error = %e, "Failed to remove scratch directory")
        }
    }
}
