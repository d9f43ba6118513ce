#![warn(missing_docs)]

//! # git-owl - Large Files Beside a Git Working Tree
//!
//! git-owl keeps files that belong in a working tree but not in git's object
//! store (datasets, build artifacts, machine-local blobs) under control. Each
//! tracked file is recorded in a small manifest as `<sha1>  <path>`, the same
//! shape `sha1sum` emits, and listed in a generated block of the exclusion
//! list so git never picks it up.
//!
//! ## Architecture
//!
//! - [`manifest`]: the manifest model with parse, merge, digest refresh and serialization
//! - [`exclude`]: the managed block inside the exclusion-list file
//! - [`commands`]: `add`, `check`, `ls`, `prepull` and `pull`
//! - [`vcs`]: the version-control collaborator (git, driven as a child process)
//! - [`fs`]: the filesystem collaborator
//! - [`config`]: optional `.gitowl.toml` configuration
//! - [`output`]: coloured diagnostics
//!
//! Every command receives an [`OwlContext`] resolved once per process plus
//! the two collaborators, so the command logic can be exercised against
//! fakes.
//!
//! ## Example Usage
//!
//! ```no_run
//! use git_owl::OwlContext;
//! use git_owl::fs::LocalFs;
//! use git_owl::vcs::git::GitCli;
//!
//! # fn main() -> anyhow::Result<()> {
//! let git = GitCli::new()?;
//! let ctx = OwlContext::resolve(&git)?;
//!
//! git_owl::commands::add::execute(&ctx, &git, &LocalFs, &["data/x.bin".to_string()])?;
//! let outcome = git_owl::commands::check::execute(&ctx, &git, &LocalFs, &Default::default())?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations.
pub mod commands;

/// Configuration loading.
pub mod config;

/// Typed error taxonomy and exit-code mapping.
pub mod errors;

/// Managed block of the exclusion-list file.
pub mod exclude;

/// Filesystem collaborator.
pub mod fs;

/// Manifest data model.
pub mod manifest;

/// Output formatting.
pub mod output;

/// Utility functions and helpers.
pub mod utils;

/// Version-control collaborator.
pub mod vcs;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::vcs::Vcs;

/// Current version of the git-owl binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the optional configuration file at the working-tree root.
pub const CONFIG_FILE: &str = ".gitowl.toml";

/// Default manifest file name, relative to the working-tree root.
pub const DEFAULT_MANIFEST_FILE: &str = ".gitowl";

/// Default exclusion-list file name, relative to the working-tree root.
pub const DEFAULT_EXCLUDE_FILE: &str = ".gitignore";

/// Exit status when every check passed.
pub const EXIT_OK: i32 = 0;

/// Exit status when `check` found missing or corrupted files.
pub const EXIT_FINDINGS: i32 = 1;

/// Exit status for fatal errors (validation, I/O, collaborator failure).
pub const EXIT_FATAL: i32 = 2;

/// Exit status when a precondition does not hold (nothing to add, malformed
/// manifest, no remote configured).
pub const EXIT_PRECONDITION: i32 = 3;

/// Per-invocation repository context.
///
/// Resolved once from the version-control collaborator and then passed by
/// reference to every command. Nothing in the crate mutates it after
/// construction.
#[derive(Debug, Clone)]
pub struct OwlContext {
    /// Absolute path of the working-tree root.
    pub root_dir: PathBuf,

    /// Absolute path of the manifest file.
    pub manifest_file: PathBuf,

    /// Absolute path of the exclusion-list file.
    pub exclude_file: PathBuf,

    /// Loaded configuration.
    pub config: Config,
}

impl OwlContext {
    /// Resolves the working-tree root through `vcs` and loads the
    /// configuration found there.
    ///
    /// # Errors
    /// Returns an error if the root cannot be resolved or the configuration
    /// file is malformed.
    pub fn resolve(vcs: &impl Vcs) -> Result<Self> {
        let root_dir = vcs
            .resolve_root()
            .context("Failed to resolve the working-tree root")?;
        let config = Config::load(&root_dir)?.with_env_overrides();
        Ok(Self::new(root_dir, config))
    }

    /// Builds a context from an explicit root and configuration.
    #[must_use]
    pub fn new(root_dir: PathBuf, config: Config) -> Self {
        let manifest_file = root_dir.join(&config.core.manifest);
        let exclude_file = root_dir.join(&config.core.exclude_file);
        Self {
            root_dir,
            manifest_file,
            exclude_file,
            config,
        }
    }

    /// Absolute location of a repository-relative manifest path.
    #[must_use]
    pub fn absolute(&self, path: &str) -> PathBuf {
        self.root_dir.join(path)
    }

    /// Working-tree root as a path reference.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}
