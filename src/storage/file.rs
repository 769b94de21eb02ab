//! JSON file storage backend
//!
//! Layout: `<root>/<user>/<record>.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{RecordKey, StorageBackend};
use crate::config::{lock_exclusive, write_atomic};

/// Stores each record as a JSON file
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, user_id: &str, key: RecordKey) -> PathBuf {
        self.root
            .join(sanitize_user_id(user_id))
            .join(format!("{}.json", key.as_str()))
    }
}

/// Keep user ids from escaping the data directory
fn sanitize_user_id(user_id: &str) -> String {
    let cleaned: String = user_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, user_id: &str, key: RecordKey) -> Result<Option<String>> {
        let path = self.record_path(user_id, key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;
        Ok(Some(content))
    }

    /// Atomic write under an exclusive lock (temp file + rename)
    fn set(&self, user_id: &str, key: RecordKey, value: &str) -> Result<()> {
        let path = self.record_path(user_id, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        let _lock = lock_exclusive(&path)?;
        write_atomic(&path, value)
    }

    fn remove(&self, user_id: &str, key: RecordKey) -> Result<()> {
        let path = self.record_path(user_id, key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove record: {}", path.display())),
        }
    }
}
