//! Configuration loading and management

mod io;
mod settings;

pub use settings::{RewardSettings, Settings, StorageKind, StorageSettings};

pub(crate) use io::{lock_exclusive, write_atomic};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Data location for the configured backend.
    ///
    /// Defaults to `~/.learnquest/progress.db` (sqlite) or
    /// `~/.learnquest/data/` (file).
    pub fn storage_path(&self) -> PathBuf {
        let storage = &self.settings.storage;
        if let Some(path) = &storage.path {
            return path.clone();
        }
        match storage.backend {
            StorageKind::File => Self::global_config_dir().join("data"),
            StorageKind::Sqlite | StorageKind::Memory => {
                Self::global_config_dir().join("progress.db")
            }
        }
    }
}
