//! Utility functions and helpers.
//!
//! - [`paths`]: path validation and manipulation

/// Path validation and manipulation utilities
pub mod paths;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `contents` by writing a sibling temporary file and
/// renaming it over the target.
///
/// Readers see either the old or the new file, never a truncated one. No lock
/// is taken, so two concurrent writers still race and the last rename wins.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written or
/// renamed into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}
