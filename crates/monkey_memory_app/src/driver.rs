//! Runs engine effects against the reveal timer and the dispatcher.

use monkey_memory::{Effect, GameEngine, GameEvent, GameSession, SequenceSource, ShuffledSequences};
use tracing::{debug, instrument};

use crate::{ResultDispatcher, RevealScheduler};

/// Owns a [`GameEngine`] and carries out the effects it returns.
#[derive(Debug)]
pub struct GameDriver<S = ShuffledSequences> {
    engine: GameEngine<S>,
    reveals: RevealScheduler,
    dispatcher: ResultDispatcher,
}

impl<S: SequenceSource> GameDriver<S> {
    /// Creates a driver around `engine`.
    pub fn new(engine: GameEngine<S>, dispatcher: ResultDispatcher) -> Self {
        Self {
            engine,
            reveals: RevealScheduler::new(),
            dispatcher,
        }
    }

    /// Returns the live session.
    pub fn session(&self) -> &GameSession {
        self.engine.session()
    }

    /// Applies `event` and performs the resulting effects.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: GameEvent) {
        for effect in self.engine.handle(event) {
            self.perform(effect);
        }
    }

    /// Feeds every expired reveal into the engine. Returns true if any did.
    pub fn poll_reveal(&mut self) -> bool {
        let mut fired = false;
        while let Some(ticket) = self.reveals.try_next() {
            fired = true;
            self.handle(GameEvent::RevealElapsed(ticket));
        }
        fired
    }

    /// Waits for the next reveal to expire and feeds it into the engine.
    ///
    /// Returns false without waiting when no reveal is scheduled.
    pub async fn wait_reveal(&mut self) -> bool {
        match self.reveals.next().await {
            Some(ticket) => {
                self.handle(GameEvent::RevealElapsed(ticket));
                true
            }
            None => false,
        }
    }

    fn perform(&mut self, effect: Effect) {
        debug!(?effect, "Performing effect");
        match effect {
            Effect::ScheduleReveal { ticket, after } => self.reveals.schedule(ticket, after),
            Effect::CancelReveal => self.reveals.cancel(),
            Effect::SubmitResult(result) => {
                self.dispatcher.dispatch(result);
            }
        }
    }
}
