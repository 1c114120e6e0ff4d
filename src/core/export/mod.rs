//! Export orchestration
//!
//! This module provides the export pipeline, including:
//! - Default version resolution and section materialization
//! - Per-work export and ZIP packaging
//! - Catalog artifacts (toc, calendar, people, packages)
//! - Run coordination and summary reporting

pub mod calendar;
pub mod catalog;
pub mod coordinator;
pub mod layout;
pub mod package;
pub mod packages;
pub mod section;
pub mod summary;
pub mod versions;
pub mod work;
pub mod writer;

pub use catalog::CatalogExporter;
pub use coordinator::ExportCoordinator;
pub use layout::{CatalogArtifact, OutputLayout};
pub use packages::PackageDescriptor;
pub use section::SectionMaterializer;
pub use summary::{ExportError, ExportErrorType, ExportSummary};
pub use versions::{resolve_defaults, DefaultVersions};
pub use work::{WorkExporter, WorkReport};
pub use writer::JsonWriter;
