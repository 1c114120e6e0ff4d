//! Watermark state and change detection
//!
//! - [`watermark`] - The persisted per-title timestamp record
//! - [`manager`] - Loading and writing the record, followed by cache invalidation
//! - [`changes`] - Deciding which works changed or were added since the record

pub mod changes;
pub mod manager;
pub mod watermark;

pub use changes::ChangeDetector;
pub use manager::{WatermarkStore, WriteMode};
pub use watermark::WatermarkRecord;
