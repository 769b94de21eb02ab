//! Configuration file I/O operations

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

impl Config {
    /// Get the global config directory path (~/.learnquest/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".learnquest")
    }

    /// Get the global config file path (~/.learnquest/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Save configuration to a file with atomic write and file locking.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        let _lock = lock_exclusive(path)?;
        write_atomic(path, &content)
    }

    /// Load configuration from `path`, or from ~/.learnquest/config.toml.
    ///
    /// The global file is created with defaults if it does not exist yet.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let global_path = Self::global_config_path();
        if !global_path.exists() {
            Self::auto_init(&global_path)?;
        }
        Self::from_file(&global_path)
    }

    /// Auto-initialize configuration when no config exists.
    ///
    /// Holds the config lock while checking, so concurrent first runs
    /// write the file once.
    fn auto_init(config_path: &Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            std::fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory: {}", config_dir.display())
            })?;
        }

        let _lock = lock_exclusive(config_path)?;

        // Another process may have created it while we waited
        if config_path.exists() {
            return Ok(());
        }

        let config_content = toml::to_string_pretty(&Self::default())
            .with_context(|| "Failed to serialize default config")?;
        write_atomic(config_path, &config_content)?;

        tracing::info!("Created {}", config_path.display());
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Take an exclusive lock next to `path`; released when the returned file drops
pub(crate) fn lock_exclusive(path: &Path) -> Result<File> {
    let lock_path = with_suffix(path, ".lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

    lock_file
        .lock_exclusive()
        .with_context(|| format!("Failed to acquire lock: {}", lock_path.display()))?;
    Ok(lock_file)
}

/// Write to a temp file, then rename over `path`
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = with_suffix(path, ".tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;

    temp_file
        .sync_all()
        .with_context(|| format!("Failed to sync {}", temp_path.display()))?;

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename into place: {}", path.display()))?;
    Ok(())
}
