//! Checksum calculation for exported artifacts
//!
//! Documents are hashed over their exact serialized bytes, so identical
//! input data yields identical checksums across runs.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded SHA-256 checksum string (64 characters).
///
/// # Examples
///
/// ```
/// use quire::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"{}");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum_bytes() {
        let checksum = calculate_checksum_bytes(b"Hello, World!");

        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_calculate_checksum_known_value() {
        assert_eq!(
            calculate_checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_calculate_checksum_different_content() {
        let first = calculate_checksum_bytes(br#"{"ref":"Foo 1"}"#);
        let second = calculate_checksum_bytes(br#"{"ref":"Foo 2"}"#);

        assert_ne!(first, second);
        assert_eq!(first, calculate_checksum_bytes(br#"{"ref":"Foo 1"}"#));
    }
}
