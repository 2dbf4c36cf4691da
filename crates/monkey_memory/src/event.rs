//! Events fed into a session and the effects it asks its owner to perform.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Cell, Difficulty, GameResult};

/// Identity of one game session.
pub type SessionId = u64;

/// Handle for one reveal phase.
///
/// A ticket names the session and round it was issued for. Delivering a
/// ticket after the session moved on (new round, new game, reset) is a no-op,
/// so a late timer can never reveal into the wrong session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealTicket {
    session: SessionId,
    round: u32,
}

impl RevealTicket {
    pub(crate) fn new(session: SessionId, round: u32) -> Self {
        Self { session, round }
    }

    /// Session the ticket was issued for.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Round the ticket was issued for.
    pub fn round(&self) -> u32 {
        self.round
    }
}

/// A discrete input to the game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Choose the difficulty. Only honoured while waiting.
    SelectDifficulty(Difficulty),
    /// Start a new game (also "play again" after a game ends).
    Start,
    /// The reveal timer for the given ticket fired.
    RevealElapsed(RevealTicket),
    /// The player clicked a cell.
    CellClicked(Cell),
    /// Abandon the session and return to difficulty selection.
    Reset,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the reveal timer; deliver the ticket back after `after` elapses.
    ScheduleReveal {
        /// Ticket to deliver as [`GameEvent::RevealElapsed`].
        ticket: RevealTicket,
        /// Reveal duration.
        after: Duration,
    },
    /// Drop any pending reveal timer.
    CancelReveal,
    /// Hand the finished game to the stats service.
    SubmitResult(GameResult),
}
