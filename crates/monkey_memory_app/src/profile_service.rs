//! Profile and score business logic layer.

use chrono::NaiveDate;
use monkey_memory::GameResult;
use tracing::{debug, info, instrument};

use crate::{DbError, GameRepository, GameScore, NewGameScore, OverallStats, User, UserStats};

/// Service layer for profiles and recorded games.
///
/// Wraps [`GameRepository`] with get-or-create semantics, result recording
/// and statistics aggregation.
#[derive(Debug, Clone)]
pub struct ProfileService {
    repository: GameRepository,
}

impl ProfileService {
    /// Creates a new profile service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating ProfileService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Returns an existing user by name or creates one if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the lookup or insert fails.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, display_name: String) -> Result<User, DbError> {
        debug!(display_name = %display_name, "Getting or creating user");

        if let Some(user) = self.repository.get_user_by_name(&display_name)? {
            info!(user_id = user.id(), "Existing user found");
            return Ok(user);
        }

        self.repository.create_user(display_name)
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the insert fails, e.g. for an unknown user.
    #[instrument(skip(self, result), fields(user_id = result.user_id(), score = result.score()))]
    pub fn record_result(&self, result: &GameResult) -> Result<GameScore, DbError> {
        debug!(difficulty = %result.difficulty(), "Recording game result");
        self.repository.record_score(NewGameScore::from(result))
    }

    /// Returns a user's aggregated statistics.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the scores cannot be loaded.
    #[instrument(skip(self))]
    pub fn user_stats(&self, user_id: i32) -> Result<UserStats, DbError> {
        let scores = self.repository.get_user_scores(user_id)?;
        Ok(UserStats::from_scores(user_id, &scores))
    }

    /// Returns statistics across all players, with activity ending on `today`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if users or scores cannot be loaded.
    #[instrument(skip(self))]
    pub fn overall_stats(&self, today: NaiveDate) -> Result<OverallStats, DbError> {
        let total_users = self.repository.count_users()?;
        let scores = self.repository.all_scores()?;
        Ok(OverallStats::from_scores(total_users, &scores, today))
    }

    /// Returns every game of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the scores cannot be loaded.
    #[instrument(skip(self))]
    pub fn history(&self, user_id: i32) -> Result<Vec<GameScore>, DbError> {
        self.repository.get_user_scores(user_id)
    }
}
