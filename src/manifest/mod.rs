//! The manifest: which files git-owl tracks and what their content was.
//!
//! On disk the manifest is plain text, one `<digest>  <path>` line per file,
//! sorted by path. In memory it is a list of [`ManifestEntry`] kept sorted and
//! unique by path; an entry may temporarily lack a digest while it is being
//! assembled, but only fully hashed manifests can be serialized.
//!
//! Entries are never removed. Merging is first-writer-wins: an entry already
//! in the receiving manifest keeps its digest.

/// Content digests
pub mod digest;
/// Path filters for `check` and filtered merges
pub mod filter;

pub use digest::{DIGEST_HEX_LEN, Digest};
pub use filter::PathFilter;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::errors::OwlError;
use crate::fs::FileSystem;
use crate::utils::paths::validate_path;
use crate::utils::write_atomic;
use crate::vcs::Vcs;

/// Separator between digest and path in a manifest line.
const FIELD_SEPARATOR: &str = "  ";

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Slash-separated path relative to the working-tree root
    pub path: String,
    /// Content digest, absent until computed or when the file is gone
    pub digest: Option<Digest>,
}

impl ManifestEntry {
    /// Entry without a digest.
    #[must_use]
    pub fn unhashed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: None,
        }
    }
}

/// Tracked paths and their digests, sorted and unique by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    found: bool,
}

impl Manifest {
    /// Empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the manifest file, or an empty manifest if it does not exist.
    ///
    /// Use [`Manifest::is_found`] to tell an absent file from an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(file: &Path) -> Result<Self> {
        if !file.exists() {
            debug!(file = %file.display(), "manifest not found");
            return Ok(Self::new());
        }

        let bytes = std::fs::read(file)
            .with_context(|| format!("Failed to read manifest from {}", file.display()))?;
        let mut manifest = Self::parse_bytes(&bytes, file)?;
        manifest.found = true;
        debug!(file = %file.display(), entries = manifest.len(), "manifest loaded");
        Ok(manifest)
    }

    /// Parses raw manifest bytes, which must be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`OwlError::ManifestParse`] naming the first line that is not
    /// valid UTF-8, or any error from [`Manifest::parse_persisted`].
    pub fn parse_bytes(bytes: &[u8], file: &Path) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            OwlError::ManifestParse {
                file: file.to_path_buf(),
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                reason: "line is not valid UTF-8".to_string(),
            }
        })?;
        Self::parse_persisted(text, file)
    }

    /// Parses persisted manifest text.
    ///
    /// Each non-empty line must be `<40 hex>  <path>`; a trailing carriage
    /// return is ignored. `file` only labels error messages.
    ///
    /// # Errors
    ///
    /// Returns [`OwlError::ManifestParse`] for a malformed line or a repeated
    /// path, and [`OwlError::UnsafePath`] for a path that fails validation.
    pub fn parse_persisted(text: &str, file: &Path) -> Result<Self> {
        let mut manifest = Self::new();

        for (index, raw) in text.split('\n').enumerate() {
            let line_no = index + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.is_empty() {
                continue;
            }

            let parse_error = |reason: String| OwlError::ManifestParse {
                file: file.to_path_buf(),
                line: line_no,
                reason,
            };

            let (digest, path) =
                split_line(line).ok_or_else(|| parse_error(format!("malformed line {line:?}")))?;
            validate_path(path).with_context(|| format!("{}:{line_no}", file.display()))?;

            let inserted = manifest.insert_if_absent(ManifestEntry {
                path: path.to_string(),
                digest: Some(digest),
            });
            if !inserted {
                return Err(parse_error(format!("duplicate path {path}")).into());
            }
        }

        Ok(manifest)
    }

    /// Builds an unhashed manifest from NUL-separated paths, as printed by
    /// `git ls-files -z`. Empty tokens are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OwlError::UnsafePath`] for the first path that fails
    /// validation.
    pub fn from_path_list(listing: &str) -> Result<Self> {
        let mut manifest = Self::new();
        for path in listing.split('\0').filter(|p| !p.is_empty()) {
            validate_path(path)?;
            manifest.insert_if_absent(ManifestEntry::unhashed(path));
        }
        Ok(manifest)
    }

    /// Whether the manifest was loaded from an existing file.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.found
    }

    /// Entries in path order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Iterates over entries in path order.
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    /// Paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    /// Entry for `path`, if tracked.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.position(path).ok().map(|i| &self.entries[i])
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, path: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|e| e.path.as_str().cmp(path))
    }

    /// Inserts `entry` unless its path is already tracked.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, entry: ManifestEntry) -> bool {
        match self.position(&entry.path) {
            Ok(_) => false,
            Err(at) => {
                self.entries.insert(at, entry);
                true
            }
        }
    }

    /// Copies entries of `other` selected by `filter` whose paths are not yet
    /// tracked here. Existing entries keep their digest.
    pub fn merge(&mut self, other: &Self, filter: Option<&PathFilter>) -> &mut Self {
        for entry in other.iter() {
            if filter::selected(filter, &entry.path) {
                self.insert_if_absent(entry.clone());
            }
        }
        self
    }

    /// Recomputes digests of entries lacking one, or of every entry when
    /// `force_all` is set. Files absent from disk end up without a digest.
    ///
    /// With `require_digest`, a file that is absent or cannot be hashed is a
    /// fatal precondition instead.
    ///
    /// # Errors
    ///
    /// Returns [`OwlError::DigestVanished`] as described above, or any error
    /// from the digest oracle.
    pub fn refresh_digests(
        &mut self,
        root: &Path,
        vcs: &impl Vcs,
        fs: &impl FileSystem,
        force_all: bool,
        require_digest: bool,
    ) -> Result<()> {
        for entry in &mut self.entries {
            if entry.digest.is_some() && !force_all {
                continue;
            }

            let file = root.join(&entry.path);
            entry.digest = if fs.exists(&file) {
                vcs.compute_digest(&file)?
            } else {
                None
            };

            if require_digest && entry.digest.is_none() {
                return Err(OwlError::DigestVanished(entry.path.clone()).into());
            }
        }
        Ok(())
    }

    /// Persisted form of the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`OwlError::UnhashedEntry`] if any entry lacks a digest.
    pub fn serialize(&self) -> Result<String> {
        let mut out = String::with_capacity(self.entries.len() * 64);
        for entry in &self.entries {
            let digest = entry
                .digest
                .as_ref()
                .ok_or_else(|| OwlError::UnhashedEntry(entry.path.clone()))?;
            out.push_str(digest.as_str());
            out.push_str(FIELD_SEPARATOR);
            out.push_str(&entry.path);
            out.push('\n');
        }
        Ok(out)
    }

    /// Serializes and atomically replaces `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, file: &Path) -> Result<()> {
        let text = self.serialize()?;
        write_atomic(file, text.as_bytes())
            .with_context(|| format!("Failed to write manifest to {}", file.display()))?;
        debug!(file = %file.display(), entries = self.len(), "manifest saved");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn split_line(line: &str) -> Option<(Digest, &str)> {
    let hex = line.get(..DIGEST_HEX_LEN)?;
    let path = line.get(DIGEST_HEX_LEN..)?.strip_prefix(FIELD_SEPARATOR)?;
    if path.is_empty() {
        return None;
    }
    Some((Digest::parse(hex)?, path))
}
