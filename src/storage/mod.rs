//! Durable per-user storage for progression records
//!
//! Progress is kept as a handful of JSON records per user, written through
//! on every mutation:
//!
//! ```text
//! ProgressionStore ──► Persistence ──► StorageBackend
//!                     (JSON, fail-open)   ├─ SqliteBackend  (~/.learnquest/progress.db)
//!                                         ├─ FileBackend    (~/.learnquest/data/<user>/*.json)
//!                                         └─ MemoryBackend  (tests, ephemeral sessions)
//! ```

mod db;
mod file;
mod memory;

pub use db::SqliteBackend;
pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{Config, StorageKind};
use crate::progress::{ChallengeProgress, LearningStats};

/// Logical records kept per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Stats,
    CompletedChallenges,
    CompletedPaths,
    ChallengeProgress,
}

impl RecordKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::CompletedChallenges => "completed-challenges",
            Self::CompletedPaths => "completed-paths",
            Self::ChallengeProgress => "challenge-progress",
        }
    }

    pub fn all() -> &'static [RecordKey] {
        &[
            Self::Stats,
            Self::CompletedChallenges,
            Self::CompletedPaths,
            Self::ChallengeProgress,
        ]
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw key-value storage for one or more users
pub trait StorageBackend: Send {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    fn get(&self, user_id: &str, key: RecordKey) -> Result<Option<String>>;

    fn set(&self, user_id: &str, key: RecordKey, value: &str) -> Result<()>;

    fn remove(&self, user_id: &str, key: RecordKey) -> Result<()>;
}

/// Everything persisted for a user; absent records are `None`
#[derive(Debug, Clone, Default)]
pub struct PersistedProgress {
    pub stats: Option<LearningStats>,
    pub completed_challenges: Option<BTreeSet<String>>,
    pub completed_paths: Option<BTreeSet<String>>,
    pub challenge_progress: Option<BTreeMap<String, ChallengeProgress>>,
}

/// JSON persistence for a single user on top of a backend
pub struct Persistence {
    backend: Box<dyn StorageBackend>,
    user_id: String,
}

impl Persistence {
    pub fn new(backend: Box<dyn StorageBackend>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
        }
    }

    /// Open the backend selected in the config for its configured user
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = &config.settings.storage;
        let backend: Box<dyn StorageBackend> = match storage.backend {
            StorageKind::Sqlite => Box::new(SqliteBackend::open(&config.storage_path())?),
            StorageKind::File => Box::new(FileBackend::new(config.storage_path())),
            StorageKind::Memory => Box::new(MemoryBackend::new()),
        };
        Ok(Self::new(backend, config.settings.user_id.clone()))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Load all records. Unreadable or corrupt records are reported absent.
    pub fn load(&self) -> PersistedProgress {
        PersistedProgress {
            stats: self.load_record(RecordKey::Stats),
            completed_challenges: self.load_record(RecordKey::CompletedChallenges),
            completed_paths: self.load_record(RecordKey::CompletedPaths),
            challenge_progress: self.load_record(RecordKey::ChallengeProgress),
        }
    }

    fn load_record<T: DeserializeOwned>(&self, key: RecordKey) -> Option<T> {
        let raw = match self.backend.get(&self.user_id, key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(
                    "Failed to read {} for {} from {}: {:#}",
                    key,
                    self.user_id,
                    self.backend.name(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding corrupt {} record for {}: {}", key, self.user_id, e);
                None
            }
        }
    }

    /// Write a record. Failures are logged, not returned.
    pub fn save<T: Serialize>(&self, key: RecordKey, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.backend.set(&self.user_id, key, &json));

        if let Err(e) = result {
            tracing::warn!(
                "Failed to save {} for {} to {}: {:#}",
                key,
                self.user_id,
                self.backend.name(),
                e
            );
        }
    }

    /// Remove a record. Failures are logged, not returned.
    pub fn clear(&self, key: RecordKey) {
        if let Err(e) = self.backend.remove(&self.user_id, key) {
            tracing::warn!(
                "Failed to clear {} for {} in {}: {:#}",
                key,
                self.user_id,
                self.backend.name(),
                e
            );
        }
    }
}
