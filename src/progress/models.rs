//! Progression data model
//!
//! Field names serialize in camelCase so records written by the web portal
//! (`totalXP`, `streakDays`, ...) load without conversion.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's learning progression (one per user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningStats {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u32,
    #[serde(rename = "streakDays")]
    pub streak_days: u32,
    /// Timestamp of the last streak evaluation that counted a day
    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(rename = "completedChallenges")]
    pub completed_challenges_count: u32,
    #[serde(rename = "completedPaths")]
    pub completed_paths_count: u32,
    /// Unlocked badge ids (set semantics)
    pub achievements: BTreeSet<String>,
}

impl Default for LearningStats {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            streak_days: 0,
            last_login: None,
            completed_challenges_count: 0,
            completed_paths_count: 0,
            achievements: BTreeSet::new(),
        }
    }
}

impl LearningStats {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }
}

/// Saved draft for an in-progress challenge
///
/// The draft content is opaque; only `lastUpdated` is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl ChallengeProgress {
    /// Merge a new snapshot over this draft.
    ///
    /// Object snapshots are merged key by key; anything else replaces
    /// the draft under the `data` key.
    pub fn merge(&mut self, snapshot: serde_json::Value, now: DateTime<Utc>) {
        match snapshot {
            serde_json::Value::Object(fields) => self.data.extend(fields),
            other => {
                self.data.insert("data".to_string(), other);
            }
        }
        self.last_updated = now;
    }

    pub fn from_snapshot(snapshot: serde_json::Value, now: DateTime<Utc>) -> Self {
        let mut progress = Self {
            data: serde_json::Map::new(),
            last_updated: now,
        };
        progress.merge(snapshot, now);
        progress
    }
}

/// Result of applying XP to a stats record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpOutcome {
    pub stats: LearningStats,
    pub leveled_up: bool,
    pub old_level: u32,
    pub new_level: u32,
}

/// Outcome returned to the UI from a completion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    #[serde(rename = "leveledUp")]
    pub leveled_up: bool,
    #[serde(rename = "oldLevel")]
    pub old_level: u32,
    #[serde(rename = "newLevel")]
    pub new_level: u32,
}

impl CompletionOutcome {
    /// Outcome of a call that changed nothing
    pub fn unchanged(level: u32) -> Self {
        Self {
            leveled_up: false,
            old_level: level,
            new_level: level,
        }
    }
}

impl From<&XpOutcome> for CompletionOutcome {
    fn from(outcome: &XpOutcome) -> Self {
        Self {
            leveled_up: outcome.leveled_up,
            old_level: outcome.old_level,
            new_level: outcome.new_level,
        }
    }
}
