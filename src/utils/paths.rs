use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::errors::OwlError;

/// Characters that may never appear in a tracked path.
const UNSAFE_CHARS: [char; 3] = ['\'', '"', '\\'];

/// Rejects paths containing a single quote, double quote or backslash.
///
/// # Errors
///
/// Returns [`OwlError::UnsafePath`] naming the offending path.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains(UNSAFE_CHARS) {
        return Err(OwlError::UnsafePath(path.to_string()).into());
    }
    Ok(())
}

/// Validates every path, failing on the first unsafe one.
///
/// # Errors
///
/// Returns [`OwlError::UnsafePath`] for the first unsafe path.
pub fn validate_all<S: AsRef<str>>(paths: &[S]) -> Result<()> {
    paths.iter().try_for_each(|p| validate_path(p.as_ref()))
}

/// Directory that holds a tracked file, as an absolute path under `root`.
///
/// Entries at the top level live directly in `root`.
#[must_use]
pub fn entry_dir(root: &Path, path: &str) -> PathBuf {
    match path.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => root.join(dir),
        _ => root.to_path_buf(),
    }
}

/// Rewrites an MSYS-style `/c/some/path` into `c:/some/path`.
///
/// Anything that does not start with a single drive letter between slashes
/// (or a bare `/c`) is returned unchanged.
#[must_use]
pub fn rewrite_drive_letter(location: &str) -> String {
    let bytes = location.as_bytes();
    let is_drive = bytes.len() >= 2
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && (bytes.len() == 2 || bytes[2] == b'/');

    if is_drive {
        format!("{}:{}", &location[1..2], &location[2..])
    } else {
        location.to_string()
    }
}

/// Turns a remote location as git reports it into a local filesystem path.
///
/// The trailing separator is dropped; on Windows, MSYS drive prefixes are
/// rewritten.
#[must_use]
pub fn native_location(location: &str) -> PathBuf {
    let trimmed = location.strip_suffix('/').unwrap_or(location);
    if cfg!(windows) {
        PathBuf::from(rewrite_drive_letter(trimmed))
    } else {
        PathBuf::from(trimmed)
    }
}
