use std::fmt;
use std::path::PathBuf;

use crate::{EXIT_FATAL, EXIT_PRECONDITION};

/// Fatal conditions git-owl distinguishes when choosing an exit status.
///
/// These travel inside `anyhow::Error`; `main` downcasts to pick the exit
/// code. Plain I/O failures carry no `OwlError` and map to [`EXIT_FATAL`].
#[derive(Debug)]
pub enum OwlError {
    /// A path contains a quote or backslash.
    UnsafePath(String),
    /// A manifest line is malformed or repeats a path.
    ManifestParse {
        /// Manifest file being parsed
        file: PathBuf,
        /// 1-based line number
        line: usize,
        /// What is wrong with the line
        reason: String,
    },
    /// None of the paths given to `add` are untracked files.
    NothingToAdd,
    /// `pull` has no explicit source and the remote has no url.
    NoRemote(String),
    /// A file disappeared between listing and hashing.
    DigestVanished(String),
    /// An entry without a digest reached serialization.
    UnhashedEntry(String),
}

impl OwlError {
    /// Exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ManifestParse { .. }
            | Self::NothingToAdd
            | Self::NoRemote(_)
            | Self::DigestVanished(_) => EXIT_PRECONDITION,
            Self::UnsafePath(_) | Self::UnhashedEntry(_) => EXIT_FATAL,
        }
    }
}

impl fmt::Display for OwlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsafePath(path) => write!(
                f,
                "Unsafe path {path:?}: paths may not contain quotes or backslashes"
            ),
            Self::ManifestParse { file, line, reason } => {
                write!(f, "{}:{line}: {reason}", file.display())
            }
            Self::NothingToAdd => write!(f, "None of the given paths are untracked files"),
            Self::NoRemote(remote) => write!(
                f,
                "No source given and remote '{remote}' has no url configured"
            ),
            Self::DigestVanished(path) => {
                write!(f, "Could not compute a digest for {path}: file disappeared")
            }
            Self::UnhashedEntry(path) => {
                write!(f, "Internal error: manifest entry {path} has no digest")
            }
        }
    }
}

impl std::error::Error for OwlError {}

/// Exit status for an error returned from a command.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<OwlError>()
        .or_else(|| err.chain().find_map(|cause| cause.downcast_ref::<OwlError>()))
        .map_or(EXIT_FATAL, OwlError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_precondition_codes() {
        let err = anyhow::Error::new(OwlError::NothingToAdd);
        assert_eq!(exit_code_for(&err), EXIT_PRECONDITION);

        let err = anyhow::Error::new(OwlError::NoRemote("origin".into()));
        assert_eq!(exit_code_for(&err), EXIT_PRECONDITION);
    }

    #[test]
    fn test_code_survives_context() {
        let result: anyhow::Result<()> = Err(OwlError::DigestVanished("a".into()).into());
        let err = result.context("Failed to refresh digests").unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_PRECONDITION);
    }

    #[test]
    fn test_untyped_errors_are_fatal() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&err), EXIT_FATAL);

        let err = anyhow::Error::new(OwlError::UnsafePath("a'b".into()));
        assert_eq!(exit_code_for(&err), EXIT_FATAL);
    }

    #[test]
    fn test_code_from_context_layer() {
        let err = anyhow::anyhow!("pathspec did not match").context(OwlError::NothingToAdd);
        assert_eq!(exit_code_for(&err), EXIT_PRECONDITION);
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = OwlError::ManifestParse {
            file: PathBuf::from(".gitowl"),
            line: 7,
            reason: "duplicate path a".into(),
        };
        assert_eq!(err.to_string(), ".gitowl:7: duplicate path a");
    }
}
