//! Backend over the local SQLite profile store.

use chrono::Utc;
use monkey_memory::GameResult;
use tracing::{debug, instrument};

use super::{BackendError, StatsBackend};
use crate::{GameScore, OverallStats, ProfileService, UserStats};

/// Stats backend that records into the local database.
///
/// Diesel calls block, so each request runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct LocalStatsBackend {
    profiles: ProfileService,
}

impl LocalStatsBackend {
    /// Creates a backend over the given profile service.
    pub fn new(profiles: ProfileService) -> Self {
        Self { profiles }
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, BackendError>
    where
        T: Send + 'static,
        F: FnOnce(ProfileService) -> Result<T, crate::DbError> + Send + 'static,
    {
        let profiles = self.profiles.clone();
        let value = tokio::task::spawn_blocking(move || work(profiles)).await??;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl StatsBackend for LocalStatsBackend {
    #[instrument(skip(self, result), fields(user_id = result.user_id(), score = result.score()))]
    async fn submit_score(&self, result: GameResult) -> Result<GameScore, BackendError> {
        debug!("Recording score locally");
        self.blocking(move |profiles| profiles.record_result(&result))
            .await
    }

    #[instrument(skip(self))]
    async fn user_scores(&self, user_id: i32) -> Result<Vec<GameScore>, BackendError> {
        self.blocking(move |profiles| profiles.history(user_id)).await
    }

    #[instrument(skip(self))]
    async fn user_stats(&self, user_id: i32) -> Result<UserStats, BackendError> {
        self.blocking(move |profiles| profiles.user_stats(user_id))
            .await
    }

    #[instrument(skip(self))]
    async fn overall_stats(&self) -> Result<OverallStats, BackendError> {
        let today = Utc::now().date_naive();
        self.blocking(move |profiles| profiles.overall_stats(today))
            .await
    }
}
