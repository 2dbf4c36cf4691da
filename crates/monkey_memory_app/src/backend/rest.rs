//! HTTP client for the remote game-scores API.

use monkey_memory::GameResult;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::{BackendError, StatsBackend};
use crate::{GameScore, OverallStats, ScoreBucket, UserStats};

/// Stats backend talking JSON to a remote service.
///
/// `base_url` is the API root, e.g. `http://localhost:8000/api`.
#[derive(Debug, Clone)]
pub struct RestStatsClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestStatsClient {
    /// Creates a client for the API rooted at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!("Creating REST stats client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the API root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the global score distribution.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn score_distribution(&self) -> Result<Vec<ScoreBucket>, BackendError> {
        self.get_json("overall-stats/distribution/").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::rejected(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl StatsBackend for RestStatsClient {
    #[instrument(skip(self, result), fields(user_id = result.user_id(), score = result.score()))]
    async fn submit_score(&self, result: GameResult) -> Result<GameScore, BackendError> {
        let url = self.url("game-scores/");
        debug!(url = %url, "POST");
        let response = self.client.post(&url).json(&result).send().await?;
        let recorded: GameScore = Self::decode(response).await?;
        info!(score_id = recorded.id(), "Score submitted");
        Ok(recorded)
    }

    #[instrument(skip(self))]
    async fn user_scores(&self, user_id: i32) -> Result<Vec<GameScore>, BackendError> {
        self.get_json(&format!("game-scores/user/{}/", user_id)).await
    }

    #[instrument(skip(self))]
    async fn user_stats(&self, user_id: i32) -> Result<UserStats, BackendError> {
        self.get_json(&format!("user-stats/{}/", user_id)).await
    }

    #[instrument(skip(self))]
    async fn overall_stats(&self) -> Result<OverallStats, BackendError> {
        self.get_json("overall-stats/").await
    }
}
