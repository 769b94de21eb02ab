//! Challenge draft command

use anyhow::{Context, Result};

use learnquest::ProgressionStore;

/// Show the saved draft for a challenge, or merge `set` into it
pub fn progress_command(store: &mut ProgressionStore, id: &str, set: Option<&str>) -> Result<()> {
    if let Some(raw) = set {
        let snapshot: serde_json::Value =
            serde_json::from_str(raw).with_context(|| format!("Invalid JSON snapshot: {}", raw))?;
        store.save_challenge_progress(id, snapshot);
        println!("Saved progress for {}", id);
        return Ok(());
    }

    match store.challenge_progress(id) {
        Some(progress) => {
            println!("{}", serde_json::to_string_pretty(progress)?);
        }
        None => println!("No saved progress for {}", id),
    }
    Ok(())
}
