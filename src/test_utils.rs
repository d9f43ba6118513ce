//! In-memory collaborators for exercising commands without git or a disk.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::errors::OwlError;
use crate::fs::FileSystem;
use crate::manifest::Digest;
use crate::vcs::Vcs;

pub fn digest(hex: &str) -> Digest {
    Digest::parse(hex).expect("test digest must be 40 lowercase hex chars")
}

/// Scripted version control: answers come from what the test registered.
#[derive(Default)]
pub struct FakeVcs {
    root: PathBuf,
    digests: HashMap<PathBuf, Digest>,
    untracked: BTreeSet<String>,
    untracked_dirs: HashSet<PathBuf>,
    remote: Option<String>,
    digest_calls: RefCell<Vec<PathBuf>>,
    staged: RefCell<Vec<PathBuf>>,
}

impl FakeVcs {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_digest(mut self, path: &str, hex: &str) -> Self {
        self.digests.insert(self.root.join(path), digest(hex));
        self
    }

    /// Registers an untracked file, visible to `list_untracked` and
    /// `resolve_working_tree_name`.
    pub fn with_untracked(mut self, path: &str) -> Self {
        self.untracked.insert(path.to_string());
        self
    }

    pub fn with_untracked_dir(mut self, dir: &str) -> Self {
        self.untracked_dirs.insert(self.root.join(dir));
        self
    }

    pub fn with_remote(mut self, url: &str) -> Self {
        self.remote = Some(url.to_string());
        self
    }

    pub fn digest_calls(&self) -> Vec<PathBuf> {
        self.digest_calls.borrow().clone()
    }

    pub fn staged(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }
}

impl Vcs for FakeVcs {
    fn resolve_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn list_untracked(&self, paths: &[String], must_all_match: bool) -> Result<String> {
        let mut listing = String::new();
        for path in paths {
            if self.untracked.contains(path) {
                listing.push_str(path);
                listing.push('\0');
            } else if must_all_match {
                return Err(anyhow!("pathspec '{path}' did not match any file(s)")
                    .context(OwlError::NothingToAdd));
            }
        }
        Ok(listing)
    }

    fn compute_digest(&self, file: &Path) -> Result<Option<Digest>> {
        self.digest_calls.borrow_mut().push(file.to_path_buf());
        Ok(self.digests.get(file).cloned())
    }

    fn stage(&self, files: &[&Path]) -> Result<()> {
        self.staged
            .borrow_mut()
            .extend(files.iter().map(|f| f.to_path_buf()));
        Ok(())
    }

    fn remote_location(&self, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote.clone())
    }

    fn path_is_untracked_directory(&self, dir: &Path) -> Result<bool> {
        Ok(self.untracked_dirs.contains(dir))
    }

    fn resolve_working_tree_name(&self, file: &Path) -> Result<Option<String>> {
        let name = file
            .strip_prefix(&self.root)
            .ok()
            .and_then(Path::to_str)
            .filter(|rel| self.untracked.contains(*rel))
            .map(str::to_string);
        Ok(name)
    }
}

/// A filesystem action recorded by [`FakeFs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    MakeDirs(PathBuf),
    Copy { src: PathBuf, dest_dir: PathBuf },
}

/// In-memory filesystem that records every mutation.
#[derive(Default)]
pub struct FakeFs {
    files: RefCell<BTreeSet<PathBuf>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    ops: RefCell<Vec<FsOp>>,
}

impl FakeFs {
    pub fn with_files(root: &Path, files: &[&str]) -> Self {
        let fs = Self::default();
        for file in files {
            fs.add_file(&root.join(file));
        }
        fs
    }

    pub fn add_file(&self, path: &Path) {
        self.files.borrow_mut().insert(path.to_path_buf());
    }

    pub fn ops(&self) -> Vec<FsOp> {
        self.ops.borrow().clone()
    }
}

impl FileSystem for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains(path)
            || self.dirs.borrow().iter().any(|d| d.starts_with(path))
            || self.files.borrow().iter().any(|f| f.starts_with(path))
    }

    fn make_dirs(&self, dir: &Path) -> Result<()> {
        self.ops.borrow_mut().push(FsOp::MakeDirs(dir.to_path_buf()));
        self.dirs.borrow_mut().insert(dir.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, src: &Path, dest_dir: &Path) -> Result<()> {
        self.ops.borrow_mut().push(FsOp::Copy {
            src: src.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
        });
        if !self.files.borrow().contains(src) {
            return Err(anyhow!("Failed to copy {}: no such file", src.display()));
        }
        let name = src
            .file_name()
            .ok_or_else(|| anyhow!("{} has no file name", src.display()))?;
        self.add_file(&dest_dir.join(name));
        Ok(())
    }
}
