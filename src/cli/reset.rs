//! Reset command implementation

use anyhow::{bail, Result};

use learnquest::ProgressionStore;

/// Delete all progress for the current user
pub fn reset_command(store: &mut ProgressionStore, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "This deletes all XP, badges and saved drafts for {}.\nRe-run with --yes to confirm.",
            store.user_id()
        );
    }

    store.reset();
    println!("Progress reset for {}", store.user_id());
    Ok(())
}
