//! The version-control collaborator.
//!
//! git-owl never reads git's object store itself. Everything it needs from
//! version control goes through [`Vcs`], implemented for real by
//! [`git::GitCli`] and by an in-memory fake in the test suite.

/// Git error categorization and handling
pub mod errors;
/// `git` child-process implementation
pub mod git;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::manifest::Digest;

/// Queries and actions git-owl delegates to version control.
pub trait Vcs {
    /// Absolute path of the working-tree root.
    ///
    /// # Errors
    ///
    /// Returns an error outside a working tree.
    fn resolve_root(&self) -> Result<PathBuf>;

    /// Untracked existing files among `paths`, as NUL-separated
    /// root-relative names. With `must_all_match`, a path that matches
    /// nothing is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    fn list_untracked(&self, paths: &[String], must_all_match: bool) -> Result<String>;

    /// Content digest of `file`, or `None` when it cannot be hashed.
    ///
    /// # Errors
    ///
    /// Returns an error if the oracle produces something that is not a digest.
    fn compute_digest(&self, file: &Path) -> Result<Option<Digest>>;

    /// Stages `files` for the next commit.
    ///
    /// # Errors
    ///
    /// Returns an error if staging fails.
    fn stage(&self, files: &[&Path]) -> Result<()>;

    /// Configured location of `remote`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read.
    fn remote_location(&self, remote: &str) -> Result<Option<String>>;

    /// Whether `dir` is known to contain untracked content.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn path_is_untracked_directory(&self, dir: &Path) -> Result<bool>;

    /// Name of the untracked file `file` relative to the current directory,
    /// or `None` if it is absent (or tracked).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn resolve_working_tree_name(&self, file: &Path) -> Result<Option<String>>;
}
