//! Artifact integrity
//!
//! Checksums recorded for every document a work export writes.

pub mod checksum;

pub use checksum::calculate_checksum_bytes;
