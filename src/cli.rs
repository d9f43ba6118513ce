//! Command-line interface definitions for git-owl.
//!
//! This module contains all CLI argument parsing structures using clap's derive macros.
//! The CLI definitions are shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes (#[arg(help = "...")]),
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::ls::LsFilter;

/// Main CLI structure for git-owl.
#[derive(Parser)]
#[command(
    name = "git-owl",
    version = crate::VERSION,
    about = "Track large files beside a git working tree",
    long_about = "Keeps large untracked files under control: records their SHA-1 in a \
                  manifest, hides them from git, verifies them and copies missing ones \
                  from another working tree"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start tracking untracked files
    Add {
        /// Paths to add
        paths: Vec<String>,
    },

    /// Verify tracked files against their recorded digests
    Check {
        /// Only report files that are absent, without hashing
        #[arg(short, long, conflicts_with = "pattern")]
        missing: bool,

        /// Only check paths matching this glob or substring
        pattern: Option<String>,
    },

    /// List tracked files
    Ls {
        /// List every tracked file
        #[arg(short, long, conflicts_with = "missing")]
        all: bool,

        /// List only tracked files that are absent
        #[arg(short, long)]
        missing: bool,
    },

    /// Create directories for tracked files that are absent
    Prepull,

    /// Copy absent tracked files from another working tree
    Pull {
        /// Root of the working tree to copy from (defaults to the remote's location)
        source: Option<String>,

        /// Print what would be done without touching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Presence filter selected by `ls` flags.
#[must_use]
pub const fn ls_filter(all: bool, missing: bool) -> LsFilter {
    match (all, missing) {
        (true, _) => LsFilter::All,
        (false, true) => LsFilter::Absent,
        (false, false) => LsFilter::Present,
    }
}
