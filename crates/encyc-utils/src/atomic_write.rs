//! Atomic file writes: temp file in the target directory, fsync, rename.
//!
//! Entry files are rewritten whole, so a crash mid-write leaves either the old
//! or the new content on disk, never a mix.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;

/// Result of an atomic write operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomicWriteResult {
    /// Bytes written to disk
    pub bytes_written: usize,
    /// Whether parent directories had to be created
    pub created_parent: bool,
}

/// Atomically write `content` to `path`, creating parent directories as needed.
pub fn write_file_atomic(path: &Utf8Path, content: &str) -> Result<AtomicWriteResult> {
    let mut result = AtomicWriteResult::default();

    let parent = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {parent}"))?;
        result.created_parent = true;
    }

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in: {parent}"))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| "Failed to write content to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .with_context(|| "Failed to fsync temporary file")?;

    temp_file
        .persist(path.as_std_path())
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to atomically write file: {path}"))?;

    result.bytes_written = content.len();
    Ok(result)
}
