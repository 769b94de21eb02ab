//! Progression store - core gamification logic
//!
//! Owns the in-memory copy of a user's progress for one session. Every
//! mutation goes through a use-case here and is written through to
//! storage before the call returns.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};

use super::checker::{
    check_challenge_achievements, check_level_achievements, check_path_achievements, unlock,
};
use super::definitions::{Achievement, AchievementId};
use super::error::{validate_reward, ProgressError};
use super::levels::{self, LevelProgress};
use super::models::{ChallengeProgress, CompletionOutcome, LearningStats};
use super::streaks::{evaluate_streak, StreakChange};
use crate::storage::{Persistence, RecordKey};

/// A badge that was just unlocked
#[derive(Debug, Clone)]
pub struct UnlockedAchievement {
    pub id: String,
    /// Catalog entry, `None` for badges outside the catalog
    pub achievement: Option<&'static Achievement>,
}

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_title: String,
}

/// Change notifications sent to subscribers
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    ChallengeCompleted { id: String },
    PathCompleted { id: String },
    XpAwarded { amount: u64 },
    LevelUp(LevelUp),
    AchievementUnlocked(UnlockedAchievement),
    StreakUpdated { change: StreakChange, streak_days: u32 },
    Reset,
}

/// Session-scoped owner of a user's progression
pub struct ProgressionStore {
    persistence: Persistence,
    stats: LearningStats,
    completed_challenges: BTreeSet<String>,
    completed_paths: BTreeSet<String>,
    challenge_progress: BTreeMap<String, ChallengeProgress>,
    streak_change: StreakChange,
    subscribers: Vec<Sender<ProgressEvent>>,
    /// Events raised before anyone subscribed, handed to the first subscriber
    pending: Vec<ProgressEvent>,
}

impl ProgressionStore {
    /// Start a session now
    pub fn open(persistence: Persistence) -> Self {
        Self::init(persistence, Utc::now())
    }

    /// Start a session at `now`: load, repair, evaluate the login streak
    /// and write the result back.
    pub fn init(persistence: Persistence, now: DateTime<Utc>) -> Self {
        let loaded = persistence.load();
        let first_run = loaded.stats.is_none();
        if first_run {
            tracing::info!("No progress found for {}, starting fresh", persistence.user_id());
        }

        let mut stats = loaded.stats.unwrap_or_default();
        let completed_challenges = loaded.completed_challenges.unwrap_or_default();
        let completed_paths = loaded.completed_paths.unwrap_or_default();
        let challenge_progress = loaded.challenge_progress.unwrap_or_default();

        if !levels::is_consistent(stats.level, stats.total_xp) {
            let repaired = levels::level_for_xp(stats.total_xp);
            tracing::warn!(
                "Stored level {} does not match {} XP, using level {}",
                stats.level,
                stats.total_xp,
                repaired
            );
            stats.level = repaired;
        }
        stats.completed_challenges_count = stats
            .completed_challenges_count
            .max(count(&completed_challenges));
        stats.completed_paths_count = stats.completed_paths_count.max(count(&completed_paths));

        let streak = evaluate_streak(&stats, now);
        tracing::debug!(
            "Login streak {}: {} day(s)",
            streak.change.label(),
            streak.stats.streak_days
        );
        let mut pending = Vec::new();
        if streak.change.is_change() {
            pending.push(ProgressEvent::StreakUpdated {
                change: streak.change,
                streak_days: streak.stats.streak_days,
            });
        }
        for id in &streak.unlocked {
            tracing::info!("Achievement unlocked: {}", Achievement::get(*id).title);
            pending.push(ProgressEvent::AchievementUnlocked(UnlockedAchievement {
                id: id.as_str().to_string(),
                achievement: Some(Achievement::get(*id)),
            }));
        }

        let store = Self {
            persistence,
            stats: streak.stats,
            completed_challenges,
            completed_paths,
            challenge_progress,
            streak_change: streak.change,
            subscribers: Vec::new(),
            pending,
        };
        store.persist_all();
        store
    }

    /// Flush every record at session end
    pub fn teardown(self) {
        self.persist_all();
        tracing::debug!("Progress session for {} closed", self.persistence.user_id());
    }

    /// Receive change notifications for the rest of the session.
    ///
    /// The first subscriber also receives what session start changed (the
    /// streak update and any streak badges).
    pub fn subscribe(&mut self) -> Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel();
        for event in self.pending.drain(..) {
            let _ = tx.send(event);
        }
        self.subscribers.push(tx);
        rx
    }

    // ========================================
    // READ ACCESS
    // ========================================

    pub fn stats(&self) -> &LearningStats {
        &self.stats
    }

    pub fn user_id(&self) -> &str {
        self.persistence.user_id()
    }

    pub fn achievements(&self) -> &BTreeSet<String> {
        &self.stats.achievements
    }

    pub fn completed_challenges(&self) -> &BTreeSet<String> {
        &self.completed_challenges
    }

    pub fn completed_paths(&self) -> &BTreeSet<String> {
        &self.completed_paths
    }

    pub fn is_challenge_completed(&self, id: &str) -> bool {
        self.completed_challenges.contains(id)
    }

    pub fn is_path_completed(&self, id: &str) -> bool {
        self.completed_paths.contains(id)
    }

    /// What the login streak evaluation did when this session started
    pub fn streak_change(&self) -> StreakChange {
        self.streak_change
    }

    pub fn level_progress(&self) -> LevelProgress {
        levels::level_progress(self.stats.level, self.stats.total_xp)
    }

    pub fn challenge_progress(&self, id: &str) -> Option<&ChallengeProgress> {
        self.challenge_progress.get(id)
    }

    // ========================================
    // USE-CASES
    // ========================================

    /// Mark a challenge solved and award its XP.
    ///
    /// Completing an already completed challenge is a no-op.
    pub fn complete_challenge(
        &mut self,
        id: &str,
        xp_reward: i64,
    ) -> Result<CompletionOutcome, ProgressError> {
        let amount = validate_reward(xp_reward)?;

        if !self.completed_challenges.insert(id.to_string()) {
            tracing::debug!("Challenge {} already completed", id);
            return Ok(CompletionOutcome::unchanged(self.stats.level));
        }
        self.stats.completed_challenges_count = self.stats.completed_challenges_count.saturating_add(1);
        self.emit(ProgressEvent::ChallengeCompleted { id: id.to_string() });

        let ids = check_challenge_achievements(self.stats.completed_challenges_count, &self.stats.achievements);
        self.unlock_all(ids);

        let outcome = self.add_xp(amount);
        self.persistence.save(RecordKey::CompletedChallenges, &self.completed_challenges);
        self.persist_stats();
        Ok(outcome)
    }

    /// Mark a learning path finished and award its XP.
    ///
    /// Completing an already completed path is a no-op.
    pub fn complete_learning_path(
        &mut self,
        id: &str,
        xp_reward: i64,
    ) -> Result<CompletionOutcome, ProgressError> {
        let amount = validate_reward(xp_reward)?;

        if !self.completed_paths.insert(id.to_string()) {
            tracing::debug!("Learning path {} already completed", id);
            return Ok(CompletionOutcome::unchanged(self.stats.level));
        }
        self.stats.completed_paths_count = self.stats.completed_paths_count.saturating_add(1);
        self.emit(ProgressEvent::PathCompleted { id: id.to_string() });

        let ids = check_path_achievements(self.stats.completed_paths_count, &self.stats.achievements);
        self.unlock_all(ids);

        let outcome = self.add_xp(amount);
        self.persistence.save(RecordKey::CompletedPaths, &self.completed_paths);
        self.persist_stats();
        Ok(outcome)
    }

    /// Record many completed challenges at once (e.g. migrating from
    /// another device). Already completed ids are skipped.
    ///
    /// Returns the number of newly imported challenges with the outcome.
    pub fn import_completed_challenges<I, S>(
        &mut self,
        ids: I,
        xp_each: i64,
    ) -> Result<(u32, CompletionOutcome), ProgressError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let amount = validate_reward(xp_each)?;

        let mut imported = 0u32;
        for id in ids {
            let id = id.into();
            if self.completed_challenges.insert(id.clone()) {
                imported += 1;
                self.emit(ProgressEvent::ChallengeCompleted { id });
            }
        }
        if imported == 0 {
            return Ok((0, CompletionOutcome::unchanged(self.stats.level)));
        }

        self.stats.completed_challenges_count =
            self.stats.completed_challenges_count.saturating_add(imported);
        let ids = check_challenge_achievements(self.stats.completed_challenges_count, &self.stats.achievements);
        self.unlock_all(ids);

        let outcome = self.add_xp(amount.saturating_mul(u64::from(imported)));
        self.persistence.save(RecordKey::CompletedChallenges, &self.completed_challenges);
        self.persist_stats();
        tracing::info!("Imported {} completed challenge(s)", imported);
        Ok((imported, outcome))
    }

    /// Award XP outside of a completion
    pub fn award_xp(&mut self, amount: i64) -> Result<CompletionOutcome, ProgressError> {
        let amount = validate_reward(amount)?;
        let outcome = self.add_xp(amount);
        self.persist_stats();
        Ok(outcome)
    }

    /// Grant a badge directly. Returns false if it was already unlocked.
    pub fn award_achievement(&mut self, id: &str) -> bool {
        if !self.stats.achievements.insert(id.to_string()) {
            return false;
        }
        self.emit(ProgressEvent::AchievementUnlocked(UnlockedAchievement {
            id: id.to_string(),
            achievement: Achievement::lookup(id),
        }));
        self.persist_stats();
        true
    }

    /// Save a draft for an in-progress challenge
    pub fn save_challenge_progress(&mut self, id: &str, snapshot: serde_json::Value) {
        self.save_challenge_progress_at(id, snapshot, Utc::now());
    }

    /// Save a draft with an explicit timestamp
    pub fn save_challenge_progress_at(
        &mut self,
        id: &str,
        snapshot: serde_json::Value,
        now: DateTime<Utc>,
    ) {
        match self.challenge_progress.get_mut(id) {
            Some(existing) => existing.merge(snapshot, now),
            None => {
                self.challenge_progress
                    .insert(id.to_string(), ChallengeProgress::from_snapshot(snapshot, now));
            }
        }
        self.persistence.save(RecordKey::ChallengeProgress, &self.challenge_progress);
    }

    /// Restore defaults and delete every stored record
    pub fn reset(&mut self) {
        self.stats = LearningStats::default();
        self.completed_challenges.clear();
        self.completed_paths.clear();
        self.challenge_progress.clear();
        self.pending.clear();

        for key in RecordKey::all() {
            self.persistence.clear(*key);
        }
        tracing::info!("Progress reset for {}", self.persistence.user_id());
        self.emit(ProgressEvent::Reset);
    }

    // ========================================
    // INTERNALS
    // ========================================

    /// Apply validated XP, then the level rules
    fn add_xp(&mut self, amount: u64) -> CompletionOutcome {
        let xp = levels::add_xp(&self.stats, amount);
        let outcome = CompletionOutcome::from(&xp);
        self.stats = xp.stats;
        self.emit(ProgressEvent::XpAwarded { amount });

        if outcome.leveled_up {
            let new_title = levels::title_for_level(outcome.new_level).to_string();
            tracing::info!("Level up: {} -> {} ({})", outcome.old_level, outcome.new_level, new_title);
            self.emit(ProgressEvent::LevelUp(LevelUp {
                old_level: outcome.old_level,
                new_level: outcome.new_level,
                new_title,
            }));

            let ids = check_level_achievements(self.stats.level, &self.stats.achievements);
            self.unlock_all(ids);
        }
        outcome
    }

    fn unlock_all(&mut self, ids: Vec<AchievementId>) {
        for id in unlock(&mut self.stats, ids) {
            self.emit(ProgressEvent::AchievementUnlocked(UnlockedAchievement {
                id: id.as_str().to_string(),
                achievement: Some(Achievement::get(id)),
            }));
        }
    }

    fn emit(&mut self, event: ProgressEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn persist_stats(&self) {
        self.persistence.save(RecordKey::Stats, &self.stats);
    }

    fn persist_all(&self) {
        self.persist_stats();
        self.persistence.save(RecordKey::CompletedChallenges, &self.completed_challenges);
        self.persistence.save(RecordKey::CompletedPaths, &self.completed_paths);
        self.persistence.save(RecordKey::ChallengeProgress, &self.challenge_progress);
    }
}

fn count(set: &BTreeSet<String>) -> u32 {
    u32::try_from(set.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use serde_json::json;

    /// Backend that reads nothing and rejects every write
    #[derive(Clone, Default)]
    struct FailingBackend {
        writes: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl FailingBackend {
        fn attempts(&self) -> usize {
            self.writes.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl crate::storage::StorageBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn get(&self, _user_id: &str, _key: RecordKey) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _user_id: &str, key: RecordKey, _value: &str) -> anyhow::Result<()> {
            self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            anyhow::bail!("disk full writing {}", key)
        }

        fn remove(&self, _user_id: &str, _key: RecordKey) -> anyhow::Result<()> {
            anyhow::bail!("read-only")
        }
    }

    fn session() -> (ProgressionStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        let persistence = Persistence::new(Box::new(backend.clone()), "tester");
        (ProgressionStore::init(persistence, Utc::now()), backend)
    }

    fn reopen(backend: &MemoryBackend) -> ProgressionStore {
        ProgressionStore::init(Persistence::new(Box::new(backend.clone()), "tester"), Utc::now())
    }

    #[test]
    fn test_first_session_defaults() {
        let (store, backend) = session();
        assert_eq!(store.stats().total_xp, 0);
        assert_eq!(store.stats().level, 1);
        assert_eq!(store.stats().streak_days, 1);
        assert_eq!(store.streak_change(), StreakChange::Started);
        assert!(!backend.is_empty());
    }

    #[test]
    fn test_complete_challenge() {
        let (mut store, _) = session();
        let outcome = store.complete_challenge("hello-world", 150).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(outcome.old_level, 1);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(store.stats().completed_challenges_count, 1);
        assert!(store.achievements().contains("first-challenge"));
        assert!(store.is_challenge_completed("hello-world"));
    }

    #[test]
    fn test_complete_challenge_twice_is_noop() {
        let (mut store, _) = session();
        store.complete_challenge("x", 100).unwrap();
        let before = store.stats().clone();

        let again = store.complete_challenge("x", 100).unwrap();
        assert!(!again.leveled_up);
        assert_eq!(store.stats(), &before);
    }

    #[test]
    fn test_negative_reward_changes_nothing() {
        let (mut store, _) = session();
        let err = store.complete_challenge("x", -5).unwrap_err();
        assert_eq!(err, ProgressError::InvalidReward { amount: -5 });
        assert!(!store.is_challenge_completed("x"));
        assert_eq!(store.stats().completed_challenges_count, 0);
    }

    #[test]
    fn test_complete_path_is_idempotent() {
        let (mut store, _) = session();
        store.complete_learning_path("rust-basics", 500).unwrap();
        store.complete_learning_path("rust-basics", 500).unwrap();
        assert_eq!(store.stats().completed_paths_count, 1);
        assert_eq!(store.stats().total_xp, 500);
        assert!(store.achievements().contains("first-path"));
    }

    #[test]
    fn test_level_badge_from_xp() {
        let (mut store, _) = session();
        // T(4) = 1000 reaches level 5
        let outcome = store.award_xp(1000).unwrap();
        assert_eq!(outcome.new_level, 5);
        assert!(store.achievements().contains("level-5"));
        assert!(!store.achievements().contains("level-10"));
    }

    #[test]
    fn test_award_achievement() {
        let (mut store, _) = session();
        assert!(store.award_achievement("security-expert"));
        assert!(!store.award_achievement("security-expert"));
        assert!(store.achievements().contains("security-expert"));
    }

    #[test]
    fn test_events() {
        let (mut store, _) = session();
        let rx = store.subscribe();
        store.complete_challenge("c1", 100).unwrap();

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert!(matches!(
            events[0],
            ProgressEvent::StreakUpdated { change: StreakChange::Started, streak_days: 1 }
        ));
        assert!(matches!(events[1], ProgressEvent::ChallengeCompleted { .. }));
        assert!(events.iter().any(|e| matches!(e, ProgressEvent::LevelUp(l) if l.new_level == 2)));
        assert!(events.iter().any(
            |e| matches!(e, ProgressEvent::AchievementUnlocked(a) if a.id == "first-challenge")
        ));
    }

    #[test]
    fn test_session_start_events_go_to_first_subscriber() {
        let (mut store, _) = session();
        let first = store.subscribe();
        let second = store.subscribe();

        let events: Vec<ProgressEvent> = first.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ProgressEvent::StreakUpdated { .. }));
        assert!(second.try_iter().next().is_none());
    }

    #[test]
    fn test_same_day_session_has_no_streak_event() {
        let (store, backend) = session();
        store.teardown();

        let mut store = reopen(&backend);
        assert_eq!(store.streak_change(), StreakChange::SameDay);
        assert!(store.subscribe().try_iter().next().is_none());
    }

    #[test]
    fn test_write_failures_keep_memory_state() {
        let backend = FailingBackend::default();
        let persistence = Persistence::new(Box::new(backend.clone()), "tester");
        let mut store = ProgressionStore::init(persistence, Utc::now());
        let attempts_after_init = backend.attempts();

        let outcome = store.complete_challenge("c1", 150).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(store.stats().total_xp, 150);
        assert!(store.is_challenge_completed("c1"));
        assert!(store.achievements().contains("first-challenge"));

        // One write per record touched, no retries
        assert_eq!(backend.attempts() - attempts_after_init, 2);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let (mut store, _) = session();
        drop(store.subscribe());
        store.award_xp(10).unwrap();
        assert!(store.subscribers.is_empty());
    }

    #[test]
    fn test_progress_survives_reopen() {
        let (mut store, backend) = session();
        store.complete_challenge("c1", 120).unwrap();
        store.save_challenge_progress("c2", json!({"code": "let x = 1;"}));
        let stats = store.stats().clone();
        store.teardown();

        let store = reopen(&backend);
        assert_eq!(store.stats(), &stats);
        assert!(store.is_challenge_completed("c1"));
        assert_eq!(store.challenge_progress("c2").unwrap().data["code"], json!("let x = 1;"));
    }

    #[test]
    fn test_reset() {
        let (mut store, backend) = session();
        store.complete_challenge("c1", 500).unwrap();
        store.save_challenge_progress("c2", json!({"code": ""}));
        store.reset();

        assert_eq!(store.stats(), &LearningStats::default());
        assert!(store.completed_challenges().is_empty());
        assert!(store.challenge_progress("c2").is_none());
        assert!(backend.is_empty());
    }
}
