//! The controller that owns the live session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::{
    Cell, Clock, Difficulty, Effect, Environment, GameEvent, GameSession, IdentityProvider,
    RevealTicket, Sequence, SequenceSource, SessionId, ShuffledSequences, SystemClock, UserId,
};

/// Default time the sequence stays on display.
pub const REVEAL_DURATION: Duration = Duration::from_millis(2000);

/// Collaborators handed to every transition.
#[derive(Debug)]
struct EngineEnv<S> {
    sequences: S,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityProvider>,
    reveal: Duration,
    last_session_id: SessionId,
}

impl<S: SequenceSource> Environment for EngineEnv<S> {
    fn generate_sequence(&mut self, length: usize) -> Sequence {
        self.sequences.generate(length)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.identity.current_user_id()
    }

    fn next_session_id(&mut self) -> SessionId {
        self.last_session_id += 1;
        self.last_session_id
    }

    fn reveal_duration(&self) -> Duration {
        self.reveal
    }
}

/// Owns exactly one [`GameSession`] and applies events to it.
///
/// The engine never performs effects itself: every method returns the
/// [`Effect`]s the caller must carry out (arm or cancel the reveal timer,
/// submit a result).
#[derive(Debug)]
pub struct GameEngine<S = ShuffledSequences> {
    session: GameSession,
    env: EngineEnv<S>,
}

impl GameEngine {
    /// Creates an engine with OS-seeded sequences, the system clock and the
    /// default reveal duration.
    #[instrument(skip(identity))]
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_parts(
            ShuffledSequences::from_os_rng(),
            Arc::new(SystemClock),
            identity,
        )
    }
}

impl<S: SequenceSource> GameEngine<S> {
    /// Creates an engine from explicit collaborators.
    #[instrument(skip_all)]
    pub fn with_parts(
        sequences: S,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            session: GameSession::default(),
            env: EngineEnv {
                sequences,
                clock,
                identity,
                reveal: REVEAL_DURATION,
                last_session_id: 0,
            },
        }
    }

    /// Overrides the reveal duration.
    pub fn with_reveal_duration(mut self, reveal: Duration) -> Self {
        self.env.reveal = reveal;
        self
    }

    /// Returns the live session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Returns the configured reveal duration.
    pub fn reveal_duration(&self) -> Duration {
        self.env.reveal
    }

    /// Applies one event to the live session.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: GameEvent) -> Vec<Effect> {
        let session = std::mem::take(&mut self.session);
        let transition = session.apply(event, &mut self.env);
        self.session = transition.session;
        debug!(
            phase = %self.session.phase(),
            effects = transition.effects.len(),
            "Event handled"
        );
        transition.effects
    }

    /// Chooses the difficulty (waiting phase only).
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        self.handle(GameEvent::SelectDifficulty(difficulty))
    }

    /// Starts a new game, discarding any finished one.
    pub fn start_game(&mut self) -> Vec<Effect> {
        self.handle(GameEvent::Start)
    }

    /// Delivers an expired reveal timer.
    pub fn reveal_elapsed(&mut self, ticket: RevealTicket) -> Vec<Effect> {
        self.handle(GameEvent::RevealElapsed(ticket))
    }

    /// Enters one cell (playing phase only).
    pub fn submit_cell(&mut self, cell: Cell) -> Vec<Effect> {
        self.handle(GameEvent::CellClicked(cell))
    }

    /// Returns to difficulty selection.
    pub fn reset_to_setup(&mut self) -> Vec<Effect> {
        self.handle(GameEvent::Reset)
    }
}
