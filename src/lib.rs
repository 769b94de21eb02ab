//! LearnQuest - learning progression engine
//!
//! Tracks a learner's experience points, derives their level, keeps a daily
//! login streak, unlocks achievement badges and stores in-progress challenge
//! drafts. State lives in a [`progress::ProgressionStore`] for the length of a
//! session and is written through to durable per-user [`storage`] on every
//! change.
//!
//! ## Storage backends
//!
//! 1. **SQLite (default)**: `~/.learnquest/progress.db`, one row per record.
//!
//! 2. **JSON files**: `~/.learnquest/data/<user>/<record>.json`, handy for
//!    inspecting or hand-editing progress.

pub mod config;
pub mod progress;
pub mod storage;

pub use progress::{CompletionOutcome, LearningStats, ProgressError, ProgressionStore};
