//! XP and Level system
//!
//! Level thresholds grow quadratically: reaching level `n + 1` takes
//! `T(n) = n * (BASE + (n - 1) * STEP)` total XP.

use super::error::{validate_reward, ProgressError};
use super::models::{LearningStats, XpOutcome};

/// XP needed to leave level 1
pub const BASE: u64 = 100;

/// Extra XP each further level adds to the per-level cost
pub const STEP: u64 = 50;

/// Rank titles by minimum level (must be sorted by level)
static TITLES: &[(u32, &str)] = &[
    (1, "Novice"),
    (5, "Apprentice"),
    (10, "Journeyman"),
    (20, "Expert"),
    (30, "Master"),
];

/// Total XP at which a user moves from level `n` to level `n + 1`.
///
/// `threshold_for_level(0)` is 0. Thresholds past `u64::MAX` saturate.
pub fn threshold_for_level(level: u32) -> u64 {
    checked_threshold(level).unwrap_or(u64::MAX)
}

/// `T(n)`, or `None` when it does not fit in a `u64` (unreachable XP)
fn checked_threshold(level: u32) -> Option<u64> {
    if level == 0 {
        return Some(0);
    }
    let n = u64::from(level);
    (n - 1)
        .checked_mul(STEP)
        .and_then(|extra| extra.checked_add(BASE))
        .and_then(|per_level| n.checked_mul(per_level))
}

/// Whether `total_xp` has reached the end of `level`
fn reached(level: u32, total_xp: u64) -> bool {
    checked_threshold(level).is_some_and(|threshold| total_xp >= threshold)
}

/// The level implied by a total XP amount
pub fn level_for_xp(total_xp: u64) -> u32 {
    // T(n) = 50 * n * (n + 1), so n(n + 1) <= total_xp / 50 gives a lower bound
    let quotient = total_xp / STEP;
    let estimate = ((4 * quotient + 1).isqrt() - 1) / 2;

    let mut level = u32::try_from(estimate).unwrap_or(u32::MAX).max(1);
    while level > 1 && !reached(level - 1, total_xp) {
        level -= 1;
    }
    while level < u32::MAX && reached(level, total_xp) {
        level += 1;
    }
    level
}

/// Whether `level` satisfies `T(level - 1) <= total_xp < T(level)`
pub fn is_consistent(level: u32, total_xp: u64) -> bool {
    level >= 1 && reached(level - 1, total_xp) && !reached(level, total_xp)
}

/// Rank title shown next to a level
pub fn title_for_level(level: u32) -> &'static str {
    TITLES
        .iter()
        .rev()
        .find(|(min, _)| level >= *min)
        .map(|(_, title)| *title)
        .unwrap_or(TITLES[0].1)
}

/// Progress towards the next level
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LevelProgress {
    /// XP still missing for the next level
    pub needed: u64,
    /// Share of the current level already earned (0.0 - 100.0)
    #[serde(rename = "progressPercentage")]
    pub progress_percentage: f64,
    /// Total XP at which the next level starts
    #[serde(rename = "nextLevelTotal")]
    pub next_level_total: u64,
}

/// Compute progress within `level` for `total_xp`.
///
/// Only meaningful when `level` is consistent with `total_xp`.
pub fn level_progress(level: u32, total_xp: u64) -> LevelProgress {
    let level = level.max(1);
    let current_level_xp = threshold_for_level(level - 1);
    let next_level_xp = threshold_for_level(level);
    let span = next_level_xp.saturating_sub(current_level_xp);
    let earned = total_xp.saturating_sub(current_level_xp).min(span);
    let progress_percentage = if span == 0 {
        100.0
    } else {
        100.0 * earned as f64 / span as f64
    };

    LevelProgress {
        needed: next_level_xp.saturating_sub(total_xp),
        progress_percentage,
        next_level_total: next_level_xp,
    }
}

/// Add `amount` XP and raise the level until the level invariant holds again
pub fn apply_xp(stats: &LearningStats, amount: i64) -> Result<XpOutcome, ProgressError> {
    let amount = validate_reward(amount)?;
    Ok(add_xp(stats, amount))
}

/// `apply_xp` for an already validated amount
pub(crate) fn add_xp(stats: &LearningStats, amount: u64) -> XpOutcome {
    let mut updated = stats.clone();
    updated.total_xp = stats.total_xp.saturating_add(amount);

    let old_level = stats.level;
    let new_level = old_level.max(level_for_xp(updated.total_xp));
    updated.level = new_level;

    XpOutcome {
        stats: updated,
        leveled_up: new_level > old_level,
        old_level,
        new_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(threshold_for_level(0), 0);
        assert_eq!(threshold_for_level(1), 100);
        assert_eq!(threshold_for_level(2), 300);
        assert_eq!(threshold_for_level(3), 600);
        assert_eq!(threshold_for_level(4), 1000);
        for n in 0..200 {
            assert!(threshold_for_level(n) < threshold_for_level(n + 1));
        }
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(299), 2);
        assert_eq!(level_for_xp(300), 3);
        assert_eq!(level_for_xp(1000), 5);
    }

    #[test]
    fn test_single_level_up() {
        let outcome = apply_xp(&LearningStats::default(), 150).unwrap();
        assert!(outcome.leveled_up);
        assert_eq!(outcome.old_level, 1);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(outcome.stats.total_xp, 150);
    }

    #[test]
    fn test_multi_level_jump() {
        let outcome = apply_xp(&LearningStats::default(), 1000).unwrap();
        assert_eq!(outcome.new_level, 5);
        assert!(is_consistent(outcome.new_level, outcome.stats.total_xp));
    }

    #[test]
    fn test_zero_xp_keeps_level() {
        let outcome = apply_xp(&LearningStats::default(), 0).unwrap();
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.new_level, 1);
    }

    #[test]
    fn test_negative_xp_rejected() {
        let err = apply_xp(&LearningStats::default(), -10).unwrap_err();
        assert_eq!(err, ProgressError::InvalidReward { amount: -10 });
    }

    #[test]
    fn test_level_invariant_over_sequence() {
        let mut stats = LearningStats::default();
        for amount in [0, 7, 93, 100, 1, 250, 999, 3, 4_000, 12_345] {
            let outcome = apply_xp(&stats, amount).unwrap();
            assert!(outcome.new_level >= outcome.old_level);
            assert!(is_consistent(outcome.stats.level, outcome.stats.total_xp));
            stats = outcome.stats;
        }
    }

    #[test]
    fn test_level_for_xp_matches_thresholds() {
        for level in 1..500 {
            let start = threshold_for_level(level - 1);
            let end = threshold_for_level(level);
            assert_eq!(level_for_xp(start), level);
            assert_eq!(level_for_xp(end - 1), level);
        }
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        assert_eq!(threshold_for_level(u32::MAX), u64::MAX);

        let top = level_for_xp(u64::MAX);
        assert!(is_consistent(top, u64::MAX));
        assert!(top < u32::MAX);

        assert!(!is_consistent(u32::MAX, 0));
        assert!(!is_consistent(u32::MAX, u64::MAX));
    }

    #[test]
    fn test_max_rewards_saturate() {
        let first = apply_xp(&LearningStats::default(), i64::MAX).unwrap();
        let second = apply_xp(&first.stats, i64::MAX).unwrap();
        assert_eq!(second.stats.total_xp, u64::MAX - 1);
        assert!(second.leveled_up);
        assert!(is_consistent(second.stats.level, second.stats.total_xp));

        let third = apply_xp(&second.stats, i64::MAX).unwrap();
        assert_eq!(third.stats.total_xp, u64::MAX);
        assert!(is_consistent(third.stats.level, third.stats.total_xp));

        let fourth = apply_xp(&third.stats, i64::MAX).unwrap();
        assert!(!fourth.leveled_up);
        assert_eq!(fourth.stats, third.stats);
    }

    #[test]
    fn test_level_progress() {
        let progress = level_progress(2, 150);
        assert_eq!(progress.needed, 150);
        assert_eq!(progress.next_level_total, 300);
        assert!((progress.progress_percentage - 25.0).abs() < 1e-9);

        let fresh = level_progress(1, 0);
        assert_eq!(fresh.needed, 100);
        assert_eq!(fresh.progress_percentage, 0.0);

        let top = level_progress(u32::MAX, u64::MAX);
        assert!(top.progress_percentage.is_finite());
    }

    #[test]
    fn test_titles() {
        assert_eq!(title_for_level(1), "Novice");
        assert_eq!(title_for_level(4), "Novice");
        assert_eq!(title_for_level(5), "Apprentice");
        assert_eq!(title_for_level(42), "Master");
    }
}
