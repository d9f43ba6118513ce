//! `add`: start tracking untracked files.

use anyhow::{Context, Result};
use tracing::info;

use crate::errors::OwlError;
use crate::exclude::ExclusionBlock;
use crate::fs::FileSystem;
use crate::manifest::Manifest;
use crate::utils::paths::validate_all;
use crate::vcs::Vcs;
use crate::{OwlContext, output};

/// Registers the untracked files among `paths`, regenerates the exclusion
/// list and stages both files.
///
/// Files already in the manifest keep their recorded digest. An empty
/// `paths` does nothing.
///
/// # Errors
///
/// Returns [`OwlError::NothingToAdd`] if no path names an
/// untracked file, and fails on unsafe paths, a malformed manifest, hashing
/// or write errors.
pub fn execute(
    ctx: &OwlContext,
    vcs: &impl Vcs,
    fs: &impl FileSystem,
    paths: &[String],
) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    validate_all(paths)?;

    let listing = vcs.list_untracked(paths, true)?;
    let listed = Manifest::from_path_list(&listing)?;
    if listed.is_empty() {
        return Err(OwlError::NothingToAdd.into());
    }

    let mut merged = Manifest::load(&ctx.manifest_file)?;
    let added: Vec<String> = listed
        .paths()
        .filter(|path| merged.get(path).is_none())
        .map(str::to_string)
        .collect();
    merged.merge(&listed, None);
    merged
        .refresh_digests(ctx.root(), vcs, fs, false, true)
        .context("Failed to hash new files")?;
    merged.save(&ctx.manifest_file)?;

    ExclusionBlock::load(&ctx.exclude_file)?.write(&ctx.exclude_file, merged.paths())?;
    vcs.stage(&[&ctx.exclude_file, &ctx.manifest_file])?;

    info!(added = added.len(), total = merged.len(), "manifest updated");
    for path in &added {
        output::action("added:", path);
    }
    Ok(())
}
