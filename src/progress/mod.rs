//! Gamification engine: XP, Levels, Streaks, and Achievements
//!
//! # Architecture
//!
//! ```text
//!  UI event ("challenge solved")
//!          │
//!          ▼
//!  ProgressionStore ──► checker / levels / streaks  (pure)
//!          │
//!          ▼
//!  Persistence (write-through)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut store = ProgressionStore::open(Persistence::from_config(&config)?);
//! let outcome = store.complete_challenge("async-basics", 100)?;
//! if outcome.leveled_up {
//!     println!("Level {}!", outcome.new_level);
//! }
//! ```

mod checker;
mod definitions;
mod error;
mod levels;
mod models;
mod store;
mod streaks;

pub use checker::{
    check_challenge_achievements, check_level_achievements, check_path_achievements,
    check_streak_achievements, unlock,
};
pub use definitions::{Achievement, AchievementCategory, AchievementId, ACHIEVEMENTS};
pub use error::ProgressError;
pub use levels::{
    apply_xp, is_consistent, level_for_xp, level_progress, threshold_for_level, title_for_level,
    LevelProgress, BASE, STEP,
};
pub use models::{ChallengeProgress, CompletionOutcome, LearningStats, XpOutcome};
pub use store::{LevelUp, ProgressEvent, ProgressionStore, UnlockedAchievement};
pub use streaks::{calendar_days_between, evaluate_streak, StreakChange, StreakOutcome};
