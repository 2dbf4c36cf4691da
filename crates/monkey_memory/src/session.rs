//! The game session value and its transition function.
//!
//! A [`GameSession`] is plain data. [`GameSession::apply`] consumes a session
//! and one [`GameEvent`] and returns the next session together with the
//! [`Effect`]s the owner must carry out. Randomness, time and identity come
//! from an [`Environment`], so the transition itself never touches the
//! outside world.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::result::duration_seconds;
use crate::{
    Cell, Difficulty, Effect, GameEvent, GameResult, Phase, RevealTicket, Sequence, SessionId,
    UserId,
};

/// Everything a transition needs from outside the session.
pub trait Environment {
    /// Produces a fresh sequence of `length` distinct cells.
    fn generate_sequence(&mut self, length: usize) -> Sequence;

    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// Signed-in user, queried once when a game finishes.
    fn current_user_id(&self) -> Option<UserId>;

    /// Allocates the identity of a newly started session.
    fn next_session_id(&mut self) -> SessionId;

    /// How long the sequence stays on display.
    fn reveal_duration(&self) -> Duration;
}

/// Output of [`GameSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The session after the event.
    pub session: GameSession,
    /// Side effects to perform, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn new(session: GameSession, effects: Vec<Effect>) -> Self {
        Self { session, effects }
    }

    fn unchanged(session: GameSession) -> Self {
        Self::new(session, Vec::new())
    }
}

/// State of the single live game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    id: SessionId,
    phase: Phase,
    difficulty: Difficulty,
    round: u32,
    sequence: Sequence,
    user_input: Vec<Cell>,
    score: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Creates a waiting session with the given difficulty selected.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Applies one event, returning the next session and its effects.
    ///
    /// Events that have no transition in the current phase leave the session
    /// untouched and produce no effects.
    #[instrument(skip(self, env), fields(session_id = self.id, phase = %self.phase))]
    pub fn apply<E: Environment + ?Sized>(self, event: GameEvent, env: &mut E) -> Transition {
        match (self.phase, event) {
            (Phase::Waiting, GameEvent::SelectDifficulty(difficulty)) => {
                debug!(%difficulty, "Difficulty selected");
                Transition::unchanged(Self { difficulty, ..self })
            }
            (Phase::Waiting | Phase::Finished, GameEvent::Start) => self.start(env),
            (Phase::Showing, GameEvent::RevealElapsed(ticket)) => self.reveal_elapsed(ticket),
            (Phase::Playing, GameEvent::CellClicked(cell)) => self.submit_cell(cell, env),
            (_, GameEvent::Reset) => self.reset(),
            (phase, event) => {
                debug!(%phase, ?event, "Event ignored in current phase");
                Transition::unchanged(self)
            }
        }
    }

    fn start<E: Environment + ?Sized>(self, env: &mut E) -> Transition {
        let length = self.difficulty.initial_length();
        let session = Self {
            id: env.next_session_id(),
            phase: Phase::Showing,
            difficulty: self.difficulty,
            round: 1,
            sequence: env.generate_sequence(length),
            user_input: Vec::new(),
            score: 0,
            started_at: Some(env.now()),
            ended_at: None,
        };
        info!(
            session_id = session.id,
            difficulty = %session.difficulty,
            length = session.sequence.len(),
            "Game started"
        );
        let effect = session.schedule_reveal(env);
        Transition::new(session, vec![effect])
    }

    fn reveal_elapsed(self, ticket: RevealTicket) -> Transition {
        if ticket != self.ticket() {
            debug!(?ticket, current = ?self.ticket(), "Stale reveal ticket ignored");
            return Transition::unchanged(self);
        }
        debug!(round = self.round, "Reveal finished, accepting input");
        Transition::unchanged(Self {
            phase: Phase::Playing,
            user_input: Vec::new(),
            ..self
        })
    }

    fn submit_cell<E: Environment + ?Sized>(mut self, cell: Cell, env: &mut E) -> Transition {
        let index = self.user_input.len();
        self.user_input.push(cell);

        if self.sequence.get(index) != Some(cell) {
            self.score = index as u32;
            self.ended_at = Some(env.now());
            self.phase = Phase::Finished;
            info!(
                session_id = self.id,
                score = self.score,
                expected = ?self.sequence.get(index),
                clicked = %cell,
                "Wrong cell, game over"
            );
            let effects = match env.current_user_id() {
                Some(user_id) => vec![Effect::SubmitResult(self.result_for(user_id))],
                None => {
                    debug!("No signed-in user, result not submitted");
                    Vec::new()
                }
            };
            return Transition::new(self, effects);
        }

        if self.user_input.len() < self.sequence.len() {
            return Transition::unchanged(self);
        }

        self.score = self.sequence.len() as u32;
        self.user_input.clear();
        let next_length = self.difficulty.next_length(self.sequence.len());
        self.sequence = env.generate_sequence(next_length);
        self.round += 1;
        self.phase = Phase::Showing;
        info!(
            session_id = self.id,
            score = self.score,
            round = self.round,
            next_length = self.sequence.len(),
            "Round complete"
        );
        let effect = self.schedule_reveal(env);
        Transition::new(self, vec![effect])
    }

    fn reset(self) -> Transition {
        debug!(from = %self.phase, "Resetting to setup");
        let effects = if self.phase == Phase::Showing {
            vec![Effect::CancelReveal]
        } else {
            Vec::new()
        };
        Transition::new(Self::new(self.difficulty), effects)
    }

    fn schedule_reveal<E: Environment + ?Sized>(&self, env: &E) -> Effect {
        Effect::ScheduleReveal {
            ticket: self.ticket(),
            after: env.reveal_duration(),
        }
    }

    fn ticket(&self) -> RevealTicket {
        RevealTicket::new(self.id, self.round)
    }

    fn result_for(&self, user_id: UserId) -> GameResult {
        let ended_at = self.ended_at.unwrap_or_else(Utc::now);
        GameResult::new(
            user_id,
            self.score,
            self.duration_seconds().unwrap_or(0),
            self.difficulty,
            ended_at,
        )
    }

    /// Session identity (0 before the first start).
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Selected difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current round, starting at 1 (0 while waiting).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Sequence of the current round.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Cells entered so far in the current round.
    pub fn user_input(&self) -> &[Cell] {
        &self.user_input
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// When the session started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the session ended.
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Whole seconds from start to end, once the session has ended.
    pub fn duration_seconds(&self) -> Option<u64> {
        Some(duration_seconds(self.started_at?, self.ended_at?))
    }

    /// Ticket of the reveal phase in progress, if any.
    pub fn pending_reveal(&self) -> Option<RevealTicket> {
        (self.phase == Phase::Showing).then(|| self.ticket())
    }

    /// `(entered, required)` cell counts for the current round.
    pub fn progress(&self) -> (usize, usize) {
        (self.user_input.len(), self.sequence.len())
    }

    /// True while `cell` should be lit as part of the sequence on display.
    pub fn is_highlighted(&self, cell: Cell) -> bool {
        self.phase == Phase::Showing && self.sequence.contains(cell)
    }

    /// True if `cell` was already entered in the current round.
    pub fn is_selected(&self, cell: Cell) -> bool {
        self.phase == Phase::Playing && self.user_input.contains(&cell)
    }
}
