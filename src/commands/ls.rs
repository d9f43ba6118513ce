//! `ls`: list tracked files by presence.

use anyhow::Result;

use crate::OwlContext;
use crate::manifest::Manifest;
use crate::vcs::Vcs;

/// Which entries `ls` shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LsFilter {
    /// Present files, by working-tree name
    #[default]
    Present,
    /// Present files by name, absent files by absolute path
    All,
    /// Absent files only, by absolute path
    Absent,
}

/// Lines `ls` prints for `manifest`, in manifest order.
///
/// An entry git reports as untracked is present and shown by its
/// working-tree name; anything else is absent and shown by absolute path.
///
/// # Errors
///
/// Returns an error if a version-control query fails.
pub fn listing(
    ctx: &OwlContext,
    manifest: &Manifest,
    vcs: &impl Vcs,
    filter: LsFilter,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for entry in manifest {
        let absolute = ctx.absolute(&entry.path);
        match vcs.resolve_working_tree_name(&absolute)? {
            Some(name) if filter != LsFilter::Absent => lines.push(name),
            Some(_) => {}
            None if filter != LsFilter::Present => {
                lines.push(absolute.display().to_string());
            }
            None => {}
        }
    }
    Ok(lines)
}

/// Runs `ls`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a query fails.
pub fn execute(ctx: &OwlContext, vcs: &impl Vcs, filter: LsFilter) -> Result<()> {
    let manifest = Manifest::load(&ctx.manifest_file)?;
    if !manifest.is_found() {
        super::report_uninitialized(ctx);
        return Ok(());
    }

    for line in listing(ctx, &manifest, vcs, filter)? {
        println!("{line}");
    }
    Ok(())
}
