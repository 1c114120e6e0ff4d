//! Output area layout
//!
//! All artifacts live under `{export_path}/{schema_version}/`. Works are
//! materialized into their own scratch directory and only their archive
//! lands in the root.

use crate::domain::{QuireError, Result, WorkTitle};
use std::path::{Path, PathBuf};

const SCRATCH_DIR: &str = ".scratch";

/// Whole-library artifacts written next to the work archives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogArtifact {
    Toc,
    SearchToc,
    HebrewCategories,
    People,
    Packages,
    Calendar,
    LastUpdated,
}

impl CatalogArtifact {
    /// Every shared artifact, in purge order
    pub const ALL: [CatalogArtifact; 7] = [
        CatalogArtifact::Toc,
        CatalogArtifact::SearchToc,
        CatalogArtifact::LastUpdated,
        CatalogArtifact::Calendar,
        CatalogArtifact::HebrewCategories,
        CatalogArtifact::People,
        CatalogArtifact::Packages,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            CatalogArtifact::Toc => "toc.json",
            CatalogArtifact::SearchToc => "search_toc.json",
            CatalogArtifact::HebrewCategories => "hebrew_categories.json",
            CatalogArtifact::People => "people.json",
            CatalogArtifact::Packages => "packages.json",
            CatalogArtifact::Calendar => "calendar.json",
            CatalogArtifact::LastUpdated => "last_updated.json",
        }
    }
}

/// Paths inside one output root
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Isolated directory a work's documents are written into before packaging
    pub fn scratch_dir(&self, title: &WorkTitle) -> PathBuf {
        self.root.join(SCRATCH_DIR).join(title.as_str())
    }

    pub fn archive_path(&self, title: &WorkTitle) -> PathBuf {
        self.root.join(title.archive_name())
    }

    /// Byte size of a work's archive, 0 if it was never exported
    pub fn archive_size(&self, title: &str) -> u64 {
        std::fs::metadata(self.root.join(format!("{title}.zip")))
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn artifact_path(&self, artifact: CatalogArtifact) -> PathBuf {
        self.root.join(artifact.file_name())
    }

    pub fn watermark_path(&self) -> PathBuf {
        self.artifact_path(CatalogArtifact::LastUpdated)
    }

    /// Remove everything under the root
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(QuireError::Persistence(format!(
                    "Failed to clear {}: {}",
                    self.root.display(),
                    e
                )))
            }
        }
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            QuireError::Persistence(format!("Failed to create {}: {}", self.root.display(), e))
        })
    }
}

/// File name of a document for a normalized reference
///
/// Path separators inside a reference would escape the scratch directory.
pub fn document_file_name(reference: &str) -> String {
    let safe: String = reference
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{safe}.json")
}
