//! JSON artifact writer
//!
//! Every artifact is written to a sibling temporary file first and renamed
//! into place, so readers never observe a half-written file.

use crate::core::verification::calculate_checksum_bytes;
use crate::domain::{QuireError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Serializes values and writes them atomically
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter {
    minify: bool,
}

impl JsonWriter {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }

    /// Serialize a value to bytes
    ///
    /// Pretty output uses a 4-space indent. Non-ASCII text is written as-is.
    pub fn to_bytes<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        if self.minify {
            return Ok(serde_json::to_vec(value)?);
        }

        let mut buffer = Vec::with_capacity(4096);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Write a value to `path`, creating parent directories
    ///
    /// Returns the SHA-256 of the written bytes.
    ///
    /// # Errors
    ///
    /// Returns [`QuireError::Persistence`] if the file cannot be written.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> Result<String> {
        let bytes = self.to_bytes(value)?;
        write_atomic(path, &bytes).await?;
        Ok(calculate_checksum_bytes(&bytes))
    }
}

/// Write bytes through a temporary sibling file and rename it over `path`
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| persistence(parent, e))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| persistence(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| persistence(path, e))?;
    Ok(())
}

/// `{path}.tmp`
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn persistence(path: &Path, e: std::io::Error) -> QuireError {
    QuireError::Persistence(format!("Failed to write {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let bytes = JsonWriter::new(false).to_bytes(&json!({"ref": "בראשית א"})).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text, "{\n    \"ref\": \"בראשית א\"\n}");
    }

    #[test]
    fn test_minified_output() {
        let bytes = JsonWriter::new(true).to_bytes(&json!({"a": [1, 2]})).unwrap();
        assert_eq!(bytes, br#"{"a":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("toc.json");

        let checksum = JsonWriter::new(true).write(&json!([]), &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"[]");
        assert_eq!(checksum, calculate_checksum_bytes(b"[]"));
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/out/Foo.zip")),
            PathBuf::from("/out/Foo.zip.tmp")
        );
    }
}
