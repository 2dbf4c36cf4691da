//! Statistics backends: where finished games go and where stats come from.

mod local;
mod rest;

pub use local::LocalStatsBackend;
pub use rest::RestStatsClient;

use derive_more::{Display, Error};
use monkey_memory::GameResult;
use tracing::instrument;

use crate::{DbError, GameScore, OverallStats, UserStats};

/// Backend error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Backend error: {} at {}:{}", message, file, line)]
pub struct BackendError {
    /// Error message.
    pub message: String,
    /// HTTP status for rejected remote requests.
    pub status: Option<u16>,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BackendError {
    /// Creates a new backend error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an error for a non-success HTTP response.
    #[track_caller]
    pub fn rejected(status: u16, body: &str) -> Self {
        let mut err = Self::new(format!("Request rejected with HTTP {}: {}", status, body));
        err.status = Some(status);
        err
    }
}

impl From<DbError> for BackendError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for BackendError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let mut converted = Self::new(format!("HTTP request failed: {}", err));
        converted.status = err.status().map(|s| s.as_u16());
        converted
    }
}

impl From<tokio::task::JoinError> for BackendError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Blocking task failed: {}", err))
    }
}

/// Destination for finished games and source of statistics.
#[async_trait::async_trait]
pub trait StatsBackend: Send + Sync + std::fmt::Debug {
    /// Records a finished game and returns the stored row.
    async fn submit_score(&self, result: GameResult) -> Result<GameScore, BackendError>;

    /// Returns every game of a user, oldest first.
    async fn user_scores(&self, user_id: i32) -> Result<Vec<GameScore>, BackendError>;

    /// Returns a user's aggregated statistics.
    async fn user_stats(&self, user_id: i32) -> Result<UserStats, BackendError>;

    /// Returns statistics across every player.
    async fn overall_stats(&self) -> Result<OverallStats, BackendError>;
}
