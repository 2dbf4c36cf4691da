//! Command-line interface for monkey_memory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Monkey Memory - how many cells can you remember?
#[derive(Parser, Debug)]
#[command(name = "monkey_memory")]
#[command(about = "Sequence-recall memory game for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./monkey_memory.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database file (created if it doesn't exist)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Remote stats API root, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// How long the sequence is shown, in milliseconds
        #[arg(long)]
        reveal_ms: Option<u64>,
    },

    /// Print personal statistics for a profile
    Stats {
        /// Profile display name
        #[arg(short, long)]
        user: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print statistics across all players
    Overall {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List profiles
    Users,

    /// Create a profile
    AddUser {
        /// Display name of the new profile
        name: String,
    },
}

impl Cli {
    /// Returns the chosen command, `play` when none was given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Play { reveal_ms: None })
    }
}
