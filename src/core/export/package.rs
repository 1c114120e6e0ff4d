//! Work archive packaging
//!
//! Packs every document in a work's scratch directory into `{title}.zip`.
//! Entries are added in sorted order with a fixed timestamp so identical
//! documents produce identical archives.

use super::writer::tmp_path;
use crate::domain::{QuireError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package the JSON documents of `scratch` into `archive`
///
/// The archive is built at `{archive}.tmp` and renamed over `archive` only
/// once it is complete, so a failure leaves any earlier archive in place.
/// Returns the archive size in bytes. Blocking; run it on a blocking thread.
pub fn package_directory(scratch: &Path, archive: &Path) -> Result<u64> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(scratch)
        .map_err(|e| {
            QuireError::Packaging(format!("Failed to read {}: {}", scratch.display(), e))
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    let tmp = tmp_path(archive);
    let result = write_archive(&entries, &tmp);
    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, archive).map_err(|e| {
        QuireError::Persistence(format!("Failed to write {}: {}", archive.display(), e))
    })?;

    let size = std::fs::metadata(archive).map(|m| m.len()).unwrap_or(0);
    tracing::debug!(
        archive = %archive.display(),
        entries = entries.len(),
        bytes = size,
        "Packaged work archive"
    );
    Ok(size)
}

fn write_archive(entries: &[PathBuf], path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| QuireError::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for entry in entries {
        let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
            return Err(QuireError::Packaging(format!(
                "Document name is not valid UTF-8: {}",
                entry.display()
            )));
        };
        let bytes = std::fs::read(entry)?;
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}
