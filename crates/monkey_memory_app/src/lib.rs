//! Monkey Memory front-end: terminal UI, profiles and score statistics.
//!
//! The game rules live in the [`monkey_memory`] crate. This crate wires the
//! engine to the outside world:
//!
//! - **Driver**: carries out engine effects (reveal timer, result submission)
//! - **Backends**: local SQLite storage or a remote REST stats service
//! - **Statistics**: personal and overall aggregates over recorded scores
//! - **Lobby**: ratatui screens for profiles, the board and statistics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use monkey_memory::{GameEngine, GameEvent, SharedIdentity};
//! use monkey_memory_app::{
//!     GameDriver, GameRepository, LocalStatsBackend, ProfileService, ResultDispatcher,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let profiles = ProfileService::new(GameRepository::open("scores.db".to_string())?);
//! let backend = Arc::new(LocalStatsBackend::new(profiles));
//! let identity = SharedIdentity::new();
//!
//! let mut driver = GameDriver::new(
//!     GameEngine::new(Arc::new(identity)),
//!     ResultDispatcher::new(backend),
//! );
//! driver.handle(GameEvent::Start);
//! driver.wait_reveal().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backend;
mod cli;
mod config;
mod db;
mod dispatch;
mod driver;
mod lobby;
mod profile_service;
mod reveal;
pub mod stats;

// Crate-level exports - Command line
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, DEFAULT_CONFIG_FILE, ENV_API_URL, ENV_DB_PATH, ENV_REVEAL_MS,
};

// Crate-level exports - Database
pub use db::{DbError, DbErrorKind, GameRepository, GameScore, MIGRATIONS, NewGameScore, User};

// Crate-level exports - Profiles and statistics
pub use profile_service::ProfileService;
pub use stats::{DailyActivity, OverallStats, ScoreBucket, UserStats};

// Crate-level exports - Backends
pub use backend::{BackendError, LocalStatsBackend, RestStatsClient, StatsBackend};

// Crate-level exports - Effect execution
pub use dispatch::ResultDispatcher;
pub use driver::GameDriver;
pub use reveal::RevealScheduler;

// Crate-level exports - Lobby
pub use lobby::{
    GameBoardScreen, LobbyController, MainLobbyScreen, OverallStatsScreen, ProfileSelectScreen,
    Screen, ScreenTransition, StatsViewScreen,
};
