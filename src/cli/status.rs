//! Status command implementation

use anyhow::Result;

use learnquest::progress::title_for_level;
use learnquest::ProgressionStore;

const BAR_WIDTH: usize = 20;

/// Show level, XP and streak for the current user
pub fn status_command(store: &ProgressionStore) -> Result<()> {
    let stats = store.stats();
    let progress = store.level_progress();

    let filled = ((progress.progress_percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    println!("User: {}\n", store.user_id());
    println!("  Level {} - {}", stats.level, title_for_level(stats.level));
    println!(
        "  [{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.progress_percentage
    );
    println!(
        "  {} XP total, {} XP to level {} (at {} XP)",
        stats.total_xp,
        progress.needed,
        stats.level + 1,
        progress.next_level_total
    );
    println!(
        "  Streak: {} day(s) ({})",
        stats.streak_days,
        store.streak_change().label()
    );
    println!(
        "  Completed: {} challenge(s), {} learning path(s)",
        stats.completed_challenges_count, stats.completed_paths_count
    );
    println!("  Badges: {}", stats.achievements.len());

    Ok(())
}
