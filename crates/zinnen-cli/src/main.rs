//! Zinnen CLI
//!
//! Terminal front end for reviewing and learning sentence flashcards.

mod commands;
mod prompt;

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zinnen_core::{LearningMode, SqliteStore, DAY_FORMAT};

/// Zinnen - sentence flashcards with spaced repetition
#[derive(Parser)]
#[command(name = "zinnen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Learn and review sentence flashcards")]
#[command(long_about = "Zinnen schedules sentence flashcards with a simplified SM-2 rule.\n\nCards are learned chunk by chunk and come back for review when they are due.")]
struct Cli {
    /// Directory holding zinnen.db (defaults to the platform data directory)
    #[arg(long, global = true, env = "ZINNEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load cards, vocabulary and a starting session from a JSON deck file
    Import {
        /// Path to the deck file
        file: PathBuf,
    },

    /// Show deck statistics and the current session
    Status,

    /// List cards due for review
    Due {
        /// Day to check instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// List the weakest reviewed cards
    Trouble,

    /// Review due cards (or trouble cards when nothing is due)
    Review {
        /// Stop after this many cards
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Practice the current chunk
    Learn {
        /// Mode to start in: learn, practice-recall, source-to-target, target-to-source
        #[arg(long, value_parser = parse_mode)]
        mode: Option<LearningMode>,
    },

    /// Move to another chunk (the next one if none is given)
    Advance {
        chunk: Option<u32>,
    },

    /// Shuffle the words of a sentence
    Jumble {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// List vocabulary, sorted by word
    Vocab,

    /// Copy the database to a file
    Backup {
        /// Output file path for the backup
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let db_path = database_path(cli.data_dir.as_deref());

    let open = || -> anyhow::Result<SqliteStore> {
        let store = SqliteStore::new(db_path.clone())?;
        tracing::debug!(path = %store.path().display(), "Opened deck");
        Ok(store)
    };

    match cli.command {
        Commands::Import { file } => commands::run_import(&open()?, &file),
        Commands::Status => commands::run_status(open()?),
        Commands::Due { date } => commands::run_due(open()?, date),
        Commands::Trouble => commands::run_trouble(open()?),
        Commands::Review { limit } => commands::run_review(open()?, limit),
        Commands::Learn { mode } => commands::run_learn(open()?, mode),
        Commands::Advance { chunk } => commands::run_advance(open()?, chunk),
        Commands::Jumble { words } => commands::run_jumble(&words.join(" ")),
        Commands::Vocab => commands::run_vocab(open()?),
        Commands::Backup { output } => commands::run_backup(&open()?, &output),
    }
}

fn database_path(data_dir: Option<&std::path::Path>) -> Option<PathBuf> {
    data_dir.map(|dir| dir.join("zinnen.db"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_mode(value: &str) -> Result<LearningMode, String> {
    LearningMode::parse_name(value).ok_or_else(|| {
        let names: Vec<&str> = LearningMode::CYCLE.iter().map(LearningMode::as_str).collect();
        format!("unknown mode '{}', expected one of: {}", value, names.join(", "))
    })
}
