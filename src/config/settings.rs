//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Whose progress this installation tracks
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Where progress is stored
    #[serde(default)]
    pub storage: StorageSettings,

    /// Default XP rewards when a caller does not pass one
    #[serde(default)]
    pub rewards: RewardSettings,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    File,
    /// Nothing survives the process (useful for demos)
    Memory,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageKind,

    /// Override the data location (database file or data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// XP reward defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSettings {
    #[serde(default = "default_challenge_xp")]
    pub challenge_xp: i64,

    #[serde(default = "default_path_xp")]
    pub path_xp: i64,
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_challenge_xp() -> i64 {
    100
}

fn default_path_xp() -> i64 {
    500
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            challenge_xp: default_challenge_xp(),
            path_xp: default_path_xp(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            storage: StorageSettings::default(),
            rewards: RewardSettings::default(),
        }
    }
}
