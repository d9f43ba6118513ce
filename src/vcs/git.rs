//! [`Vcs`] backed by the `git` executable.
//!
//! Every call spawns `git` with an argument vector; nothing is ever passed
//! through a shell, so paths need no quoting.

use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{Level, debug, span};

use super::Vcs;
use super::errors::GitError;
use crate::errors::OwlError;
use crate::manifest::Digest;

/// Global option making git match manifest paths exactly; `*`, `?` and `[`
/// are legal in tracked file names.
const LITERAL_PATHSPECS: &str = "--literal-pathspecs";

/// Runs `git` in a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Resolved `git` executable
    git: PathBuf,
    /// Directory git runs in; user-supplied relative paths resolve here
    work_dir: PathBuf,
}

impl GitCli {
    /// Locates `git` on `PATH` and runs it from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `git` is not installed or the current directory
    /// is unavailable.
    pub fn new() -> Result<Self> {
        let work_dir =
            std::env::current_dir().context("Failed to determine the current directory")?;
        Self::in_dir(work_dir)
    }

    /// Locates `git` on `PATH` and runs it from `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `git` is not installed.
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Result<Self> {
        let git = which::which("git")
            .map_err(|e| GitError::NotInstalled(format!("git: {e}")))?;
        Ok(Self {
            git,
            work_dir: work_dir.into(),
        })
    }

    fn output<I, S>(&self, args: I) -> Result<(String, Output)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let label = format!(
            "git {}",
            args.iter()
                .map(|a| a.to_string_lossy())
                .find(|a| !a.starts_with('-'))
                .unwrap_or_default()
        );

        let _span = span!(Level::DEBUG, "git", command = %label).entered();
        debug!(?args, work_dir = %self.work_dir.display(), "spawning git");

        let output = Command::new(&self.git)
            .args(&args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {label}"))?;

        debug!(status = ?output.status, stdout_len = output.stdout.len(), "git finished");
        Ok((label, output))
    }

    /// Runs git and returns stdout, turning a failure into a [`GitError`].
    fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (label, output) = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let error = GitError::from_stderr(&label, &stderr);
            debug!(error_type = error.error_type(), "git failed");
            return Err(error.into());
        }
        String::from_utf8(output.stdout).with_context(|| format!("{label}: output is not UTF-8"))
    }
}

fn first_nul_token(listing: &str) -> Option<String> {
    listing
        .split('\0')
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

impl Vcs for GitCli {
    fn resolve_root(&self) -> Result<PathBuf> {
        let stdout = self.run(["rev-parse", "--show-toplevel"])?;
        let root = stdout.trim_end_matches(['\n', '\r']);
        if root.is_empty() {
            bail!("git rev-parse: no working tree (bare repository?)");
        }
        Ok(PathBuf::from(root))
    }

    fn list_untracked(&self, paths: &[String], must_all_match: bool) -> Result<String> {
        let mut args: Vec<&OsStr> = ["ls-files", "--others", "--full-name", "-z"]
            .into_iter()
            .map(OsStr::new)
            .collect();
        if must_all_match {
            args.push(OsStr::new("--error-unmatch"));
        }
        args.push(OsStr::new("--"));
        args.extend(paths.iter().map(OsStr::new));

        match self.run(args) {
            Err(e) if must_all_match => match e.downcast::<GitError>() {
                Ok(git_err @ GitError::PathspecMismatch(_)) => {
                    Err(anyhow::Error::new(git_err).context(OwlError::NothingToAdd))
                }
                Ok(git_err) => Err(git_err.into()),
                Err(e) => Err(e),
            },
            other => other,
        }
    }

    fn compute_digest(&self, file: &Path) -> Result<Option<Digest>> {
        let (label, output) =
            self.output([OsStr::new("hash-object"), OsStr::new("--"), file.as_os_str()])?;
        if !output.status.success() {
            debug!(
                file = %file.display(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "file could not be hashed"
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let hex = stdout.trim();
        if hex.is_empty() {
            return Ok(None);
        }
        Digest::parse(hex).map(Some).with_context(|| {
            format!("{label}: unexpected digest {hex:?} for {}", file.display())
        })
    }

    fn stage(&self, files: &[&Path]) -> Result<()> {
        let mut args = vec![OsStr::new("add"), OsStr::new("--")];
        args.extend(files.iter().map(|f| f.as_os_str()));
        self.run(args)?;
        Ok(())
    }

    fn remote_location(&self, remote: &str) -> Result<Option<String>> {
        let key = format!("remote.{remote}.url");
        let (label, output) = self.output(["config", "--get", key.as_str()])?;

        // `git config --get` exits 1 when the key is unset
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::from_stderr(&label, &stderr).into());
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }

    fn path_is_untracked_directory(&self, dir: &Path) -> Result<bool> {
        let listing = self.run([
            OsStr::new(LITERAL_PATHSPECS),
            OsStr::new("ls-files"),
            OsStr::new("--others"),
            OsStr::new("--directory"),
            OsStr::new("-z"),
            OsStr::new("--"),
            dir.as_os_str(),
        ])?;
        Ok(first_nul_token(&listing).is_some())
    }

    fn resolve_working_tree_name(&self, file: &Path) -> Result<Option<String>> {
        let listing = self.run([
            OsStr::new(LITERAL_PATHSPECS),
            OsStr::new("ls-files"),
            OsStr::new("--others"),
            OsStr::new("-z"),
            OsStr::new("--"),
            file.as_os_str(),
        ])?;
        Ok(first_nul_token(&listing))
    }
}
