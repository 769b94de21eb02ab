//! Achievement definitions and metadata
//!
//! All badges are defined here. Ids are the stable strings stored in
//! `LearningStats::achievements`.

/// Unique identifier for each known badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Challenge achievements
    FirstChallenge,
    FiveChallenges,
    TenChallenges,
    TwentyFiveChallenges,
    FiftyChallenges,

    // Learning path achievements
    FirstPath,
    ThreePaths,
    FivePaths,

    // Level achievements
    Level5,
    Level10,
    Level20,
    Level30,

    // Streak achievements
    Streak3,
    Streak7,
    Streak30,

    // Special achievements (awarded manually)
    BlockchainExpert,
    AiSpecialist,
    SecurityExpert,
}

impl AchievementId {
    /// Get the string ID used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstChallenge => "first-challenge",
            Self::FiveChallenges => "5-challenges",
            Self::TenChallenges => "10-challenges",
            Self::TwentyFiveChallenges => "25-challenges",
            Self::FiftyChallenges => "50-challenges",
            Self::FirstPath => "first-path",
            Self::ThreePaths => "3-paths",
            Self::FivePaths => "5-paths",
            Self::Level5 => "level-5",
            Self::Level10 => "level-10",
            Self::Level20 => "level-20",
            Self::Level30 => "level-30",
            Self::Streak3 => "streak-3",
            Self::Streak7 => "streak-7",
            Self::Streak30 => "streak-30",
            Self::BlockchainExpert => "blockchain-expert",
            Self::AiSpecialist => "ai-specialist",
            Self::SecurityExpert => "security-expert",
        }
    }

    /// Parse from a stored string
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == s)
    }

    /// Get all achievement IDs
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstChallenge,
            Self::FiveChallenges,
            Self::TenChallenges,
            Self::TwentyFiveChallenges,
            Self::FiftyChallenges,
            Self::FirstPath,
            Self::ThreePaths,
            Self::FivePaths,
            Self::Level5,
            Self::Level10,
            Self::Level20,
            Self::Level30,
            Self::Streak3,
            Self::Streak7,
            Self::Streak30,
            Self::BlockchainExpert,
            Self::AiSpecialist,
            Self::SecurityExpert,
        ]
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCategory {
    Challenge,
    Path,
    Level,
    Streak,
    Special,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Challenge => "Challenges",
            Self::Path => "Learning Paths",
            Self::Level => "Levels",
            Self::Streak => "Streaks",
            Self::Special => "Special",
        }
    }
}

/// Achievement definition with display metadata
#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    /// Counter value that unlocks the badge (None for special badges)
    pub target: Option<u32>,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    // === CHALLENGES ===
    Achievement {
        id: AchievementId::FirstChallenge,
        title: "First Steps",
        description: "Complete your first challenge",
        category: AchievementCategory::Challenge,
        target: Some(1),
    },
    Achievement {
        id: AchievementId::FiveChallenges,
        title: "Getting Started",
        description: "Complete 5 challenges",
        category: AchievementCategory::Challenge,
        target: Some(5),
    },
    Achievement {
        id: AchievementId::TenChallenges,
        title: "Challenge Enthusiast",
        description: "Complete 10 challenges",
        category: AchievementCategory::Challenge,
        target: Some(10),
    },
    Achievement {
        id: AchievementId::TwentyFiveChallenges,
        title: "Challenge Master",
        description: "Complete 25 challenges",
        category: AchievementCategory::Challenge,
        target: Some(25),
    },
    Achievement {
        id: AchievementId::FiftyChallenges,
        title: "Challenge Champion",
        description: "Complete 50 challenges",
        category: AchievementCategory::Challenge,
        target: Some(50),
    },
    // === PATHS ===
    Achievement {
        id: AchievementId::FirstPath,
        title: "Path Finder",
        description: "Complete your first learning path",
        category: AchievementCategory::Path,
        target: Some(1),
    },
    Achievement {
        id: AchievementId::ThreePaths,
        title: "Path Explorer",
        description: "Complete 3 learning paths",
        category: AchievementCategory::Path,
        target: Some(3),
    },
    Achievement {
        id: AchievementId::FivePaths,
        title: "Path Master",
        description: "Complete 5 learning paths",
        category: AchievementCategory::Path,
        target: Some(5),
    },
    // === LEVELS ===
    Achievement {
        id: AchievementId::Level5,
        title: "Apprentice",
        description: "Reach level 5",
        category: AchievementCategory::Level,
        target: Some(5),
    },
    Achievement {
        id: AchievementId::Level10,
        title: "Journeyman",
        description: "Reach level 10",
        category: AchievementCategory::Level,
        target: Some(10),
    },
    Achievement {
        id: AchievementId::Level20,
        title: "Expert",
        description: "Reach level 20",
        category: AchievementCategory::Level,
        target: Some(20),
    },
    Achievement {
        id: AchievementId::Level30,
        title: "Master",
        description: "Reach level 30",
        category: AchievementCategory::Level,
        target: Some(30),
    },
    // === STREAKS ===
    Achievement {
        id: AchievementId::Streak3,
        title: "Consistent Learner",
        description: "Maintain a 3-day learning streak",
        category: AchievementCategory::Streak,
        target: Some(3),
    },
    Achievement {
        id: AchievementId::Streak7,
        title: "Weekly Warrior",
        description: "Maintain a 7-day learning streak",
        category: AchievementCategory::Streak,
        target: Some(7),
    },
    Achievement {
        id: AchievementId::Streak30,
        title: "Monthly Maven",
        description: "Maintain a 30-day learning streak",
        category: AchievementCategory::Streak,
        target: Some(30),
    },
    // === SPECIAL ===
    Achievement {
        id: AchievementId::BlockchainExpert,
        title: "Blockchain Expert",
        description: "Complete all blockchain challenges",
        category: AchievementCategory::Special,
        target: None,
    },
    Achievement {
        id: AchievementId::AiSpecialist,
        title: "AI Specialist",
        description: "Complete all AI challenges",
        category: AchievementCategory::Special,
        target: None,
    },
    Achievement {
        id: AchievementId::SecurityExpert,
        title: "Security Expert",
        description: "Complete all security challenges",
        category: AchievementCategory::Special,
        target: None,
    },
];

impl Achievement {
    /// Get the definition for a known id
    pub fn get(id: AchievementId) -> &'static Achievement {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .unwrap_or(&ACHIEVEMENTS[0])
    }

    /// Look up a stored badge string; `None` for badges outside the catalog
    pub fn lookup(id: &str) -> Option<&'static Achievement> {
        AchievementId::from_str(id).map(Self::get)
    }

    /// All definitions in a category
    pub fn by_category(category: AchievementCategory) -> impl Iterator<Item = &'static Achievement> {
        ACHIEVEMENTS.iter().filter(move |a| a.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_definition() {
        for id in AchievementId::all() {
            assert!(ACHIEVEMENTS.iter().any(|a| a.id == *id), "missing {}", id);
        }
        assert_eq!(ACHIEVEMENTS.len(), AchievementId::all().len());
    }

    #[test]
    fn test_string_roundtrip() {
        for id in AchievementId::all() {
            assert_eq!(AchievementId::from_str(id.as_str()), Some(*id));
        }
        assert_eq!(AchievementId::from_str("unknown-badge"), None);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Achievement::lookup("streak-7").map(|a| a.title), Some("Weekly Warrior"));
        assert!(Achievement::lookup("not-a-badge").is_none());
        assert_eq!(Achievement::by_category(AchievementCategory::Special).count(), 3);
    }
}
