//! `prepull`: create the directories tracked files live in.

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::fs::FileSystem;
use crate::manifest::Manifest;
use crate::utils::paths::entry_dir;
use crate::{OwlContext, output};

/// Creates every missing directory that holds a manifest entry.
///
/// Returns the directories created, in path order.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a directory cannot
/// be created.
pub fn execute(ctx: &OwlContext, fs: &impl FileSystem) -> Result<Vec<PathBuf>> {
    let manifest = Manifest::load(&ctx.manifest_file)?;

    let dirs: BTreeSet<PathBuf> = manifest
        .paths()
        .map(|path| entry_dir(ctx.root(), path))
        .collect();

    let mut created = Vec::new();
    for dir in dirs {
        if fs.exists(&dir) {
            continue;
        }
        fs.make_dirs(&dir)?;
        output::verbose(&format!("created {}", dir.display()));
        created.push(dir);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_utils::{FakeFs, FsOp};
    use tempfile::TempDir;

    const A: &str = "1111111111111111111111111111111111111111";

    #[test]
    fn test_creates_missing_dirs_once() -> Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        let ctx = OwlContext::new(root.to_path_buf(), Config::default());
        std::fs::write(
            &ctx.manifest_file,
            format!("{A}  a/b/one.bin\n{A}  a/b/two.bin\n{A}  keep/x.bin\n{A}  top.bin\n"),
        )?;
        let fs = FakeFs::with_files(root, &["keep/x.bin", ".gitowl"]);

        let created = execute(&ctx, &fs)?;

        assert_eq!(created, vec![root.join("a/b")]);
        assert_eq!(fs.ops(), vec![FsOp::MakeDirs(root.join("a/b"))]);
        Ok(())
    }

    #[test]
    fn test_no_manifest_is_noop() -> Result<()> {
        let temp = TempDir::new()?;
        let ctx = OwlContext::new(temp.path().to_path_buf(), Config::default());
        let fs = FakeFs::default();
        assert!(execute(&ctx, &fs)?.is_empty());
        assert!(fs.ops().is_empty());
        Ok(())
    }
}
