//! The filesystem collaborator: existence checks, directory creation and
//! single-file copies.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tracing::debug;

/// Filesystem actions used by the commands.
pub trait FileSystem {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `dir` and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn make_dirs(&self, dir: &Path) -> Result<()>;

    /// Copies the file `src` into `dest_dir`, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` has no file name or the copy fails.
    fn copy_file(&self, src: &Path, dest_dir: &Path) -> Result<()>;
}

/// [`FileSystem`] on the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn make_dirs(&self, dir: &Path) -> Result<()> {
        debug!(dir = %dir.display(), "creating directory");
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))
    }

    fn copy_file(&self, src: &Path, dest_dir: &Path) -> Result<()> {
        let name = src
            .file_name()
            .ok_or_else(|| anyhow!("Cannot copy {}: not a file path", src.display()))?;
        let dest = dest_dir.join(name);

        debug!(src = %src.display(), dest = %dest.display(), "copying file");
        std::fs::copy(src, &dest).with_context(|| {
            format!("Failed to copy {} to {}", src.display(), dest_dir.display())
        })?;
        Ok(())
    }
}
