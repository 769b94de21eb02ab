//! Daily login streak tracking
//!
//! Streaks count local calendar days, not elapsed 24h windows: a login at
//! 23:50 followed by one at 00:10 extends the streak.

use chrono::{DateTime, Local, Utc};

use super::checker::{check_streak_achievements, unlock};
use super::definitions::AchievementId;
use super::models::LearningStats;

/// What a streak evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// No previous login recorded
    Started,
    /// Already counted today
    SameDay,
    /// Logged in on the next calendar day
    Extended,
    /// More than one day since the last login
    Broken,
}

impl StreakChange {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::SameDay => "same day",
            Self::Extended => "extended",
            Self::Broken => "broken",
        }
    }

    /// Whether the stats record was modified
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::SameDay)
    }
}

/// Result of evaluating the streak at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakOutcome {
    pub stats: LearningStats,
    pub change: StreakChange,
    /// Streak badges unlocked by an extension
    pub unlocked: Vec<AchievementId>,
}

/// Whole local calendar days between two instants
pub fn calendar_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let from = earlier.with_timezone(&Local).date_naive();
    let to = later.with_timezone(&Local).date_naive();
    (to - from).num_days()
}

/// Reconcile `last_login` with `now`.
///
/// Idempotent within one calendar day. A `last_login` in the future (clock
/// moved backwards) counts as the same day.
pub fn evaluate_streak(stats: &LearningStats, now: DateTime<Utc>) -> StreakOutcome {
    let mut updated = stats.clone();

    let Some(last_login) = stats.last_login else {
        updated.streak_days = 1;
        updated.last_login = Some(now);
        return StreakOutcome {
            stats: updated,
            change: StreakChange::Started,
            unlocked: Vec::new(),
        };
    };

    let change = match calendar_days_between(last_login, now) {
        ..=0 => StreakChange::SameDay,
        1 => {
            updated.streak_days = stats.streak_days.saturating_add(1);
            updated.last_login = Some(now);
            StreakChange::Extended
        }
        _ => {
            updated.streak_days = 1;
            updated.last_login = Some(now);
            StreakChange::Broken
        }
    };

    let unlocked = if change == StreakChange::Extended {
        let ids = check_streak_achievements(updated.streak_days, &updated.achievements);
        unlock(&mut updated, ids)
    } else {
        Vec::new()
    };

    StreakOutcome {
        stats: updated,
        change,
        unlocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn local_noon(day: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2024, 3, day, 12, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn stats_with_streak(days: u32, last: DateTime<Utc>) -> LearningStats {
        LearningStats {
            streak_days: days,
            last_login: Some(last),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_login() {
        let now = local_noon(1);
        let outcome = evaluate_streak(&LearningStats::default(), now);
        assert_eq!(outcome.change, StreakChange::Started);
        assert_eq!(outcome.stats.streak_days, 1);
        assert_eq!(outcome.stats.last_login, Some(now));
    }

    #[test]
    fn test_same_day_unchanged() {
        let stats = stats_with_streak(4, local_noon(10));
        let outcome = evaluate_streak(&stats, local_noon(10) + Duration::hours(3));
        assert_eq!(outcome.change, StreakChange::SameDay);
        assert_eq!(outcome.stats, stats);
    }

    #[test]
    fn test_next_day_extends() {
        let stats = stats_with_streak(4, local_noon(10));
        let now = local_noon(11);
        let outcome = evaluate_streak(&stats, now);
        assert_eq!(outcome.change, StreakChange::Extended);
        assert_eq!(outcome.stats.streak_days, 5);
        assert_eq!(outcome.stats.last_login, Some(now));
    }

    #[test]
    fn test_gap_resets() {
        let stats = stats_with_streak(9, local_noon(10));
        let outcome = evaluate_streak(&stats, local_noon(15));
        assert_eq!(outcome.change, StreakChange::Broken);
        assert_eq!(outcome.stats.streak_days, 1);
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn test_idempotent_within_day() {
        let stats = stats_with_streak(2, local_noon(10));
        let first = evaluate_streak(&stats, local_noon(11));
        let second = evaluate_streak(&first.stats, local_noon(11) + Duration::hours(2));
        assert_eq!(second.change, StreakChange::SameDay);
        assert_eq!(second.stats, first.stats);
    }

    #[test]
    fn test_extension_unlocks_streak_badge() {
        let stats = stats_with_streak(2, local_noon(10));
        let outcome = evaluate_streak(&stats, local_noon(11));
        assert_eq!(outcome.stats.streak_days, 3);
        assert_eq!(outcome.unlocked, vec![AchievementId::Streak3]);
        assert!(outcome.stats.has_achievement("streak-3"));
    }

    #[test]
    fn test_reset_does_not_unlock() {
        let stats = stats_with_streak(29, local_noon(1));
        let outcome = evaluate_streak(&stats, local_noon(20));
        assert!(!outcome.stats.has_achievement("streak-3"));
    }

    #[test]
    fn test_extension_saturates() {
        let stats = stats_with_streak(u32::MAX, local_noon(10));
        let outcome = evaluate_streak(&stats, local_noon(11));
        assert_eq!(outcome.change, StreakChange::Extended);
        assert_eq!(outcome.stats.streak_days, u32::MAX);
    }

    #[test]
    fn test_is_change() {
        assert!(StreakChange::Started.is_change());
        assert!(StreakChange::Extended.is_change());
        assert!(StreakChange::Broken.is_change());
        assert!(!StreakChange::SameDay.is_change());
    }

    #[test]
    fn test_clock_moved_backwards() {
        let stats = stats_with_streak(3, local_noon(12));
        let outcome = evaluate_streak(&stats, local_noon(11));
        assert_eq!(outcome.change, StreakChange::SameDay);
        assert_eq!(outcome.stats.streak_days, 3);
    }
}
