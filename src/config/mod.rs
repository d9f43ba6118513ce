//! Optional per-repository configuration read from `.gitowl.toml`.
//!
//! ```toml
//! [core]
//! manifest = ".gitowl"
//! exclude_file = ".gitignore"
//!
//! [remote]
//! name = "origin"
//! ```
//!
//! Every key is optional. `GIT_OWL_MANIFEST`, `GIT_OWL_EXCLUDE_FILE` and
//! `GIT_OWL_REMOTE` override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{CONFIG_FILE, DEFAULT_EXCLUDE_FILE, DEFAULT_MANIFEST_FILE};

/// git-owl configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// File locations
    #[serde(default)]
    pub core: CoreConfig,

    /// Default `pull` source
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// File locations, relative to the working-tree root.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CoreConfig {
    /// Manifest file
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Exclusion-list file holding the managed block
    #[serde(default = "default_exclude_file")]
    pub exclude_file: PathBuf,
}

/// Remote whose location `pull` uses when no source is given.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Remote name
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            exclude_file: default_exclude_file(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            name: default_remote_name(),
        }
    }
}

impl Config {
    /// Loads `.gitowl.toml` from `root`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not
    /// valid TOML.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Applies `GIT_OWL_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(manifest) = lookup("GIT_OWL_MANIFEST") {
            self.core.manifest = PathBuf::from(manifest);
        }
        if let Some(exclude_file) = lookup("GIT_OWL_EXCLUDE_FILE") {
            self.core.exclude_file = PathBuf::from(exclude_file);
        }
        if let Some(remote) = lookup("GIT_OWL_REMOTE") {
            self.remote.name = remote;
        }
        self
    }
}

// Default functions for serde
fn default_manifest() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_FILE)
}

fn default_exclude_file() -> PathBuf {
    PathBuf::from(DEFAULT_EXCLUDE_FILE)
}

fn default_remote_name() -> String {
    "origin".to_string()
}
