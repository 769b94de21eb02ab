//! Achievement checking logic
//!
//! Each check inspects one counter and returns the badges whose threshold is
//! reached but which are not unlocked yet. Checks are pure; `unlock` applies
//! their result to a stats record.

use std::collections::BTreeSet;

use super::definitions::AchievementId;
use super::models::LearningStats;

const CHALLENGE_MILESTONES: [(u32, AchievementId); 5] = [
    (1, AchievementId::FirstChallenge),
    (5, AchievementId::FiveChallenges),
    (10, AchievementId::TenChallenges),
    (25, AchievementId::TwentyFiveChallenges),
    (50, AchievementId::FiftyChallenges),
];

const PATH_MILESTONES: [(u32, AchievementId); 3] = [
    (1, AchievementId::FirstPath),
    (3, AchievementId::ThreePaths),
    (5, AchievementId::FivePaths),
];

const LEVEL_MILESTONES: [(u32, AchievementId); 4] = [
    (5, AchievementId::Level5),
    (10, AchievementId::Level10),
    (20, AchievementId::Level20),
    (30, AchievementId::Level30),
];

const STREAK_MILESTONES: [(u32, AchievementId); 3] = [
    (3, AchievementId::Streak3),
    (7, AchievementId::Streak7),
    (30, AchievementId::Streak30),
];

fn check_milestones(
    value: u32,
    milestones: &[(u32, AchievementId)],
    unlocked: &BTreeSet<String>,
) -> Vec<AchievementId> {
    milestones
        .iter()
        .filter(|(threshold, id)| value >= *threshold && !unlocked.contains(id.as_str()))
        .map(|(_, id)| *id)
        .collect()
}

/// Check challenge count achievements (5 achievements)
pub fn check_challenge_achievements(
    completed_challenges: u32,
    unlocked: &BTreeSet<String>,
) -> Vec<AchievementId> {
    check_milestones(completed_challenges, &CHALLENGE_MILESTONES, unlocked)
}

/// Check learning path achievements (3 achievements)
pub fn check_path_achievements(completed_paths: u32, unlocked: &BTreeSet<String>) -> Vec<AchievementId> {
    check_milestones(completed_paths, &PATH_MILESTONES, unlocked)
}

/// Check level achievements (4 achievements)
pub fn check_level_achievements(level: u32, unlocked: &BTreeSet<String>) -> Vec<AchievementId> {
    check_milestones(level, &LEVEL_MILESTONES, unlocked)
}

/// Check streak achievements (3 achievements)
pub fn check_streak_achievements(streak_days: u32, unlocked: &BTreeSet<String>) -> Vec<AchievementId> {
    check_milestones(streak_days, &STREAK_MILESTONES, unlocked)
}

/// Add badges to `stats`, returning the ones that were actually new
pub fn unlock(stats: &mut LearningStats, ids: Vec<AchievementId>) -> Vec<AchievementId> {
    ids.into_iter()
        .filter(|id| stats.achievements.insert(id.as_str().to_string()))
        .inspect(|id| tracing::debug!("Achievement unlocked: {}", id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_threshold() {
        let ids = check_challenge_achievements(5, &unlocked(&["first-challenge"]));
        assert_eq!(ids, vec![AchievementId::FiveChallenges]);
    }

    #[test]
    fn test_catch_up_after_jump() {
        let ids = check_challenge_achievements(12, &BTreeSet::new());
        assert_eq!(
            ids,
            vec![
                AchievementId::FirstChallenge,
                AchievementId::FiveChallenges,
                AchievementId::TenChallenges,
            ]
        );
    }

    #[test]
    fn test_nothing_below_threshold() {
        assert!(check_path_achievements(0, &BTreeSet::new()).is_empty());
        assert!(check_level_achievements(4, &BTreeSet::new()).is_empty());
        assert!(check_streak_achievements(2, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_level_and_streak_rules() {
        assert_eq!(
            check_level_achievements(10, &unlocked(&["level-5"])),
            vec![AchievementId::Level10]
        );
        assert_eq!(
            check_streak_achievements(30, &BTreeSet::new()),
            vec![AchievementId::Streak3, AchievementId::Streak7, AchievementId::Streak30]
        );
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut stats = LearningStats::default();
        let ids = check_path_achievements(3, &stats.achievements);
        let first = unlock(&mut stats, ids);
        assert_eq!(first.len(), 2);

        let again = unlock(&mut stats, vec![AchievementId::FirstPath, AchievementId::ThreePaths]);
        assert!(again.is_empty());
        assert_eq!(stats.achievements.len(), 2);
    }
}
