//! Completion commands (challenges, learning paths, bulk import)

use anyhow::Result;

use learnquest::progress::ProgressEvent;
use learnquest::ProgressionStore;

use super::print_outcome;

/// Complete a single challenge
pub fn complete_challenge_command(store: &mut ProgressionStore, id: &str, xp: i64) -> Result<()> {
    let events = store.subscribe();

    if store.is_challenge_completed(id) {
        println!("Challenge {} was already completed.", id);
        return Ok(());
    }
    let outcome = store.complete_challenge(id, xp)?;

    println!("Challenge completed: {}", id);
    let events: Vec<ProgressEvent> = events.try_iter().collect();
    print_outcome(&outcome, &events);
    Ok(())
}

/// Complete a learning path
pub fn complete_path_command(store: &mut ProgressionStore, id: &str, xp: i64) -> Result<()> {
    let events = store.subscribe();

    if store.is_path_completed(id) {
        println!("Learning path {} was already completed.", id);
        return Ok(());
    }
    let outcome = store.complete_learning_path(id, xp)?;

    println!("Learning path completed: {}", id);
    let events: Vec<ProgressEvent> = events.try_iter().collect();
    print_outcome(&outcome, &events);
    Ok(())
}

/// Import several completed challenges
pub fn import_command(store: &mut ProgressionStore, ids: Vec<String>, xp_each: i64) -> Result<()> {
    let events = store.subscribe();
    let requested = ids.len();
    let (imported, outcome) = store.import_completed_challenges(ids, xp_each)?;

    println!(
        "Imported {} of {} challenge(s) ({} already completed)",
        imported,
        requested,
        requested - imported as usize
    );
    let events: Vec<ProgressEvent> = events.try_iter().collect();
    print_outcome(&outcome, &events);
    Ok(())
}
