//! CLI command implementations

pub mod achievements;
pub mod complete;
pub mod init;
pub mod progress;
pub mod reset;
pub mod status;

use anyhow::Result;

use learnquest::config::Config;
use learnquest::progress::{CompletionOutcome, ProgressEvent};
use learnquest::storage::Persistence;
use learnquest::ProgressionStore;

/// Open a progress session for the configured user
pub fn open_store(config: &Config) -> Result<ProgressionStore> {
    let persistence = Persistence::from_config(config)?;
    tracing::debug!(
        "Opening progress for {} ({} backend)",
        persistence.user_id(),
        persistence.backend_name()
    );
    Ok(ProgressionStore::open(persistence))
}

/// Print what a completion changed
pub fn print_outcome(outcome: &CompletionOutcome, events: &[ProgressEvent]) {
    for event in events {
        match event {
            ProgressEvent::StreakUpdated { change, streak_days } => {
                println!("  Streak {}: {} day(s)", change.label(), streak_days)
            }
            ProgressEvent::XpAwarded { amount } if *amount > 0 => println!("  +{} XP", amount),
            ProgressEvent::LevelUp(level_up) => println!(
                "  Level up! {} -> {} ({})",
                level_up.old_level, level_up.new_level, level_up.new_title
            ),
            ProgressEvent::AchievementUnlocked(unlocked) => {
                let title = unlocked.achievement.map(|a| a.title).unwrap_or("Unknown Badge");
                println!("  Badge unlocked: {} [{}]", title, unlocked.id);
            }
            _ => {}
        }
    }
    if !outcome.leveled_up {
        println!("  Level {}", outcome.new_level);
    }
}
