//! Command implementations.
//!
//! Each command takes the resolved [`crate::OwlContext`] plus the two
//! collaborators. Results meant for scripts are printed to stdout; progress
//! and notices go through [`crate::output`].

pub mod add;
pub mod check;
pub mod ls;
pub mod prepull;
pub mod pull;

use crate::{EXIT_FINDINGS, EXIT_OK, output};

/// Result of a command that can report findings without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Clean,
    /// At least one file was reported
    Findings,
}

impl Outcome {
    /// `Findings` if `reported` is non-zero.
    #[must_use]
    pub const fn from_count(reported: usize) -> Self {
        if reported == 0 {
            Self::Clean
        } else {
            Self::Findings
        }
    }

    /// Process exit status for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Clean => EXIT_OK,
            Self::Findings => EXIT_FINDINGS,
        }
    }
}

/// Notice printed when a read-only command finds no manifest.
fn report_uninitialized(ctx: &crate::OwlContext) {
    output::warning(&format!(
        "git-owl is not initialized here: no manifest at {}",
        ctx.manifest_file.display()
    ));
}
