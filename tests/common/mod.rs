#![allow(dead_code)]

use anyhow::{Result, bail};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tempfile::TempDir;

/// Environment variables that would redirect git-owl away from its defaults.
const OWL_ENV: [&str; 4] = [
    "GIT_OWL_MANIFEST",
    "GIT_OWL_EXCLUDE_FILE",
    "GIT_OWL_REMOTE",
    "GIT_OWL_LOG",
];

/// A throwaway git working tree for driving the binary end to end.
pub struct TestRepo {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    /// Creates an empty repository in a fresh temporary directory.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("work");
        fs::create_dir(&root)?;
        git(&root, &["init", "--quiet"])?;
        Ok(Self { temp_dir, root })
    }

    /// Creates a second repository next to this one.
    pub fn sibling(&self, name: &str) -> Result<PathBuf> {
        let dir = self.temp_dir.path().join(name);
        fs::create_dir(&dir)?;
        git(&dir, &["init", "--quiet"])?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `contents` to a repository-relative file, creating parents.
    pub fn write(&self, rel: &str, contents: &[u8]) -> Result<()> {
        write_file(&self.root, rel, contents)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        Ok(fs::read_to_string(self.root.join(rel))?)
    }

    /// The git-owl binary, run from the repository root.
    pub fn owl(&self) -> Result<Command> {
        owl_in(&self.root)
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        git(&self.root, args)
    }
}

pub fn write_file(root: &Path, rel: &str, contents: &[u8]) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

pub fn owl_in(dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("git-owl")?;
    cmd.current_dir(dir);
    for var in OWL_ENV {
        cmd.env_remove(var);
    }
    Ok(cmd)
}

pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// SHA-1 git assigns to a blob with these contents.
pub fn blob_digest(dir: &Path, rel: &str) -> Result<String> {
    Ok(git(dir, &["hash-object", "--", rel])?.trim().to_string())
}
