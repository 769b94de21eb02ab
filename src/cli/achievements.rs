//! Achievement commands

use anyhow::Result;

use learnquest::progress::{Achievement, AchievementCategory, ACHIEVEMENTS};
use learnquest::ProgressionStore;

const CATEGORIES: [AchievementCategory; 5] = [
    AchievementCategory::Challenge,
    AchievementCategory::Path,
    AchievementCategory::Level,
    AchievementCategory::Streak,
    AchievementCategory::Special,
];

/// List unlocked badges, or the whole catalog with `all`
pub fn achievements_command(store: &ProgressionStore, all: bool) -> Result<()> {
    let unlocked = store.achievements();

    if !all {
        if unlocked.is_empty() {
            println!("No badges yet.");
            return Ok(());
        }
        println!("Badges ({}):\n", unlocked.len());
        for id in unlocked {
            match Achievement::lookup(id) {
                Some(a) => println!("  {} - {}", a.title, a.description),
                None => println!("  Unknown Badge [{}]", id),
            }
        }
        return Ok(());
    }

    println!("Badges ({}/{}):", unlocked.len(), ACHIEVEMENTS.len());
    for category in CATEGORIES {
        println!("\n{}", category.label());
        for a in Achievement::by_category(category) {
            let mark = if unlocked.contains(a.id.as_str()) { "x" } else { " " };
            println!("  [{}] {:<22} {}", mark, a.title, a.description);
        }
    }
    Ok(())
}

/// Grant a badge manually
pub fn award_command(store: &mut ProgressionStore, badge: &str) -> Result<()> {
    if Achievement::lookup(badge).is_none() {
        tracing::warn!("{} is not a known badge", badge);
    }

    if store.award_achievement(badge) {
        println!("Badge awarded: {}", badge);
    } else {
        println!("Badge {} was already unlocked.", badge);
    }
    Ok(())
}
