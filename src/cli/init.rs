//! Init command implementation

use anyhow::{bail, Result};
use std::path::Path;

/// Default configuration content for learnquest init
pub const DEFAULT_CONFIG: &str = r#"# LearnQuest Configuration
# ========================

[settings]
# Whose progress is tracked. Each user gets separate XP, streak and badges.
user_id = "local"

# Where progress is stored
#   backend - "sqlite" (default), "file" (one JSON file per record) or "memory"
#   path    - database file (sqlite) or data directory (file)
#             defaults: ~/.learnquest/progress.db, ~/.learnquest/data/
[settings.storage]
backend = "sqlite"

# XP awarded when a completion does not specify a reward
[settings.rewards]
challenge_xp = 100
path_xp = 500
"#;

/// Write the default config file
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}
