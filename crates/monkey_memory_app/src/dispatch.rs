//! Fire-and-forget submission of finished games.

use std::sync::Arc;

use monkey_memory::GameResult;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::StatsBackend;

/// Sends finished games to a [`StatsBackend`] without blocking the game.
///
/// Failures are logged and otherwise dropped; the player never sees them.
#[derive(Debug, Clone)]
pub struct ResultDispatcher {
    backend: Arc<dyn StatsBackend>,
}

impl ResultDispatcher {
    /// Creates a dispatcher over `backend`.
    pub fn new(backend: Arc<dyn StatsBackend>) -> Self {
        Self { backend }
    }

    /// Spawns the submission of `result`.
    ///
    /// The handle is only useful to tests; callers normally drop it.
    #[instrument(skip(self, result), fields(user_id = result.user_id(), score = result.score()))]
    pub fn dispatch(&self, result: GameResult) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match backend.submit_score(result).await {
                Ok(recorded) => info!(
                    score_id = recorded.id(),
                    user_id = recorded.user_id(),
                    score = recorded.score(),
                    "Game result submitted"
                ),
                Err(e) => warn!(error = %e, "Failed to submit game result"),
            }
        })
    }
}
