//! `check`: compare tracked files on disk against the manifest.

use anyhow::Result;
use std::fmt;

use super::Outcome;
use crate::OwlContext;
use crate::fs::FileSystem;
use crate::manifest::{Manifest, PathFilter, filter};
use crate::vcs::Vcs;

/// What `check` verifies.
#[derive(Debug, Clone)]
pub enum CheckMode {
    /// Recompute digests of entries selected by the optional filter
    Full {
        /// Only check matching paths
        filter: Option<PathFilter>,
    },
    /// Only report entries whose file is absent
    ExistenceOnly,
}

impl Default for CheckMode {
    fn default() -> Self {
        Self::Full { filter: None }
    }
}

/// A tracked file that did not verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// The file is not on disk
    Missing(String),
    /// The file's digest differs from the manifest
    Failed(String),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "{path}: MISSING"),
            Self::Failed(path) => write!(f, "{path}: FAILED"),
        }
    }
}

/// Paths of entries whose file is absent, in manifest order.
#[must_use]
pub fn missing_files(ctx: &OwlContext, manifest: &Manifest, fs: &impl FileSystem) -> Vec<String> {
    manifest
        .iter()
        .filter(|entry| !fs.exists(&ctx.absolute(&entry.path)))
        .map(|entry| entry.path.clone())
        .collect()
}

/// Rehashes every selected entry and classifies the ones that do not match.
///
/// # Errors
///
/// Returns an error if the digest oracle fails.
pub fn verify(
    ctx: &OwlContext,
    manifest: &Manifest,
    vcs: &impl Vcs,
    fs: &impl FileSystem,
    path_filter: Option<&PathFilter>,
) -> Result<Vec<Finding>> {
    let mut current = Manifest::new();
    current.merge(manifest, path_filter);
    current.refresh_digests(ctx.root(), vcs, fs, true, false)?;

    let findings = manifest
        .iter()
        .filter(|entry| filter::selected(path_filter, &entry.path))
        .filter_map(|recorded| {
            let fresh = current.get(&recorded.path)?;
            match &fresh.digest {
                None => Some(Finding::Missing(recorded.path.clone())),
                Some(digest) if Some(digest) != recorded.digest.as_ref() => {
                    Some(Finding::Failed(recorded.path.clone()))
                }
                Some(_) => None,
            }
        })
        .collect();

    Ok(findings)
}

/// Runs `check` and prints one line per reported file.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or hashing fails.
pub fn execute(
    ctx: &OwlContext,
    vcs: &impl Vcs,
    fs: &impl FileSystem,
    mode: &CheckMode,
) -> Result<Outcome> {
    let manifest = Manifest::load(&ctx.manifest_file)?;
    if !manifest.is_found() {
        super::report_uninitialized(ctx);
        return Ok(Outcome::Clean);
    }

    let reported = match mode {
        CheckMode::ExistenceOnly => {
            let missing = missing_files(ctx, &manifest, fs);
            for path in &missing {
                println!("{path}");
            }
            missing.len()
        }
        CheckMode::Full { filter } => {
            let findings = verify(ctx, &manifest, vcs, fs, filter.as_ref())?;
            for finding in &findings {
                println!("{finding}");
            }
            findings.len()
        }
    };

    Ok(Outcome::from_count(reported))
}
