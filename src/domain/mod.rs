//! Domain models and types for Quire.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`WorkTitle`])
//! - **Corpus read models** ([`Work`], [`Version`], [`TextRef`], [`TextChunk`], [`Link`])
//! - **Exported document shapes** ([`ExportDocument`], [`TopLevelDocument`])
//! - **The catalog tree** ([`CatalogNode`])
//! - **Error types** ([`QuireError`], [`CdnError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, QuireError>`]:
//!
//! ```rust
//! use quire::domain::{QuireError, Result, WorkTitle};
//!
//! fn parse_title(raw: &str) -> Result<WorkTitle> {
//!     WorkTitle::new(raw).map_err(QuireError::Resolution)
//! }
//! ```

pub mod catalog;
pub mod document;
pub mod errors;
pub mod ids;
pub mod result;
pub mod work;

pub use catalog::CatalogNode;
pub use document::{
    AttributionFields, AttributionSide, ExportDocument, GroupedDocument, SegmentRecord,
    SimpleLink, TopLevelDocument,
};
pub use errors::{CdnError, QuireError};
pub use ids::WorkTitle;
pub use result::Result;
pub use work::{Link, TextChunk, TextRef, Version, Work, PRIMARY_LANGUAGE, TRANSLATION_LANGUAGE};
