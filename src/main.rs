use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use learnquest::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "learnquest")]
#[command(about = "Learning progression - XP, levels, streaks and badges")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.learnquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Track progress for this user instead of the configured one
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP and streak
    Status,

    /// Mark a challenge as completed
    Complete {
        /// Challenge id
        id: String,

        /// XP reward (defaults to rewards.challenge_xp)
        #[arg(long, allow_hyphen_values = true)]
        xp: Option<i64>,
    },

    /// Mark a learning path as completed
    CompletePath {
        /// Learning path id
        id: String,

        /// XP reward (defaults to rewards.path_xp)
        #[arg(long, allow_hyphen_values = true)]
        xp: Option<i64>,
    },

    /// Import challenges completed elsewhere
    Import {
        /// Challenge ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// XP per imported challenge (defaults to rewards.challenge_xp)
        #[arg(long, allow_hyphen_values = true)]
        xp: Option<i64>,
    },

    /// Grant a badge manually
    Award {
        /// Badge id (e.g. security-expert)
        badge: String,
    },

    /// List unlocked badges
    Achievements {
        /// Show the whole catalog, including locked badges
        #[arg(long)]
        all: bool,
    },

    /// Show or save the draft of an in-progress challenge
    Progress {
        /// Challenge id
        id: String,

        /// JSON snapshot to merge into the draft
        #[arg(long)]
        set: Option<String>,
    },

    /// Delete all progress for the user
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Init { force }) = cli.command {
        let path = cli.config.unwrap_or_else(Config::global_config_path);
        return cli::init::init_command(&path, force);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        config.settings.user_id = user;
    }
    let rewards = config.settings.rewards.clone();
    let mut store = cli::open_store(&config)?;

    match cli.command {
        None | Some(Commands::Status) => cli::status::status_command(&store),
        Some(Commands::Complete { id, xp }) => {
            cli::complete::complete_challenge_command(&mut store, &id, xp.unwrap_or(rewards.challenge_xp))
        }
        Some(Commands::CompletePath { id, xp }) => {
            cli::complete::complete_path_command(&mut store, &id, xp.unwrap_or(rewards.path_xp))
        }
        Some(Commands::Import { ids, xp }) => {
            cli::complete::import_command(&mut store, ids, xp.unwrap_or(rewards.challenge_xp))
        }
        Some(Commands::Award { badge }) => cli::achievements::award_command(&mut store, &badge),
        Some(Commands::Achievements { all }) => cli::achievements::achievements_command(&store, all),
        Some(Commands::Progress { id, set }) => {
            cli::progress::progress_command(&mut store, &id, set.as_deref())
        }
        Some(Commands::Reset { yes }) => cli::reset::reset_command(&mut store, yes),
        Some(Commands::Init { .. }) => Ok(()),
    }?;

    store.teardown();
    Ok(())
}
