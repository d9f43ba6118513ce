//! `pull`: copy missing tracked files from another working tree.
//!
//! The source is a directory on the same host or a mounted filesystem,
//! either given explicitly or taken from the configured remote's location.
//! Files already present locally are never touched, even when their content
//! differs.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::OwlError;
use crate::fs::FileSystem;
use crate::manifest::Manifest;
use crate::utils::paths::{entry_dir, native_location, validate_path};
use crate::vcs::Vcs;
use crate::{OwlContext, output};

/// Options for `pull`.
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Root of the working tree to copy from; the remote's location if unset
    pub source: Option<String>,
    /// Print the actions instead of performing them
    pub dry_run: bool,
}

/// A single step of a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullAction {
    /// Create a directory and its ancestors
    MakeDirs(PathBuf),
    /// Copy `src` into `dest_dir`
    Copy {
        /// Manifest path of the file
        path: String,
        /// File in the source tree
        src: PathBuf,
        /// Local directory receiving it
        dest_dir: PathBuf,
    },
}

/// Resolves the tree to pull from.
///
/// # Errors
///
/// Returns [`OwlError::NoRemote`] if no source is given and the configured
/// remote has no location, or [`OwlError::UnsafePath`] for an unsafe source.
pub fn resolve_source(
    ctx: &OwlContext,
    vcs: &impl Vcs,
    explicit: Option<&str>,
) -> Result<PathBuf> {
    let location = match explicit {
        Some(source) => source.to_string(),
        None => {
            let remote = &ctx.config.remote.name;
            vcs.remote_location(remote)?
                .ok_or_else(|| OwlError::NoRemote(remote.clone()))?
        }
    };
    validate_path(&location)?;
    Ok(native_location(&location))
}

/// Actions needed to bring every absent manifest entry over from `source`.
///
/// # Errors
///
/// Returns an error if a version-control query fails.
pub fn plan(
    ctx: &OwlContext,
    manifest: &Manifest,
    vcs: &impl Vcs,
    fs: &impl FileSystem,
    source: &Path,
) -> Result<Vec<PullAction>> {
    let mut actions = Vec::new();
    let mut prepared: HashSet<PathBuf> = HashSet::new();

    for entry in manifest {
        if fs.exists(&ctx.absolute(&entry.path)) {
            continue;
        }

        let dest_dir = entry_dir(ctx.root(), &entry.path);
        if !prepared.contains(&dest_dir) {
            if !vcs.path_is_untracked_directory(&dest_dir)? {
                actions.push(PullAction::MakeDirs(dest_dir.clone()));
            }
            prepared.insert(dest_dir.clone());
        }

        actions.push(PullAction::Copy {
            path: entry.path.clone(),
            src: source.join(&entry.path),
            dest_dir,
        });
    }

    Ok(actions)
}

/// Runs `pull`.
///
/// # Errors
///
/// Returns an error if no source can be resolved, or on the first directory
/// or copy failure. Nothing already copied is rolled back.
pub fn execute(
    ctx: &OwlContext,
    vcs: &impl Vcs,
    fs: &impl FileSystem,
    options: &PullOptions,
) -> Result<()> {
    let source = resolve_source(ctx, vcs, options.source.as_deref())?;
    let manifest = Manifest::load(&ctx.manifest_file)?;
    let actions = plan(ctx, &manifest, vcs, fs, &source)?;

    if actions.is_empty() {
        output::info("Nothing to pull");
        return Ok(());
    }

    for action in &actions {
        match action {
            PullAction::MakeDirs(dir) if options.dry_run => {
                println!("mkdir -p {}", dir.display());
            }
            PullAction::MakeDirs(dir) => fs.make_dirs(dir)?,
            PullAction::Copy { src, dest_dir, .. } if options.dry_run => {
                println!("cp {} {}", src.display(), dest_dir.display());
            }
            PullAction::Copy {
                path,
                src,
                dest_dir,
            } => {
                fs.copy_file(src, dest_dir)
                    .with_context(|| format!("Failed to pull {path}"))?;
                info!(%path, src = %src.display(), "pulled");
                if let Some(name) = vcs.resolve_working_tree_name(&ctx.absolute(path))? {
                    println!("{name}");
                }
            }
        }
    }

    if !options.dry_run {
        let copied = actions
            .iter()
            .filter(|a| matches!(a, PullAction::Copy { .. }))
            .count();
        output::success(&format!("Pulled {copied} file(s) from {}", source.display()));
    }
    Ok(())
}
