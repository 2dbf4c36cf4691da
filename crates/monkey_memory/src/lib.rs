//! Monkey Memory game engine.
//!
//! A sequence-recall game: the board shows a sequence of cells, hides it,
//! and the player clicks the cells back in order. Each completed round
//! lengthens the sequence; the first wrong click ends the game.
//!
//! # Architecture
//!
//! - **Board**: 18 numbered cells, three per row ([`Cell`])
//! - **Sequences**: duplicate-free, uniformly shuffled ([`ShuffledSequences`])
//! - **Session**: plain data with a pure transition function ([`GameSession::apply`])
//! - **Engine**: owns the single live session and reports [`Effect`]s ([`GameEngine`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use monkey_memory::{Anonymous, Difficulty, Effect, GameEngine, Phase};
//!
//! let mut engine = GameEngine::new(Arc::new(Anonymous));
//! engine.select_difficulty(Difficulty::Medium);
//!
//! let effects = engine.start_game();
//! assert_eq!(engine.session().phase(), Phase::Showing);
//! assert_eq!(engine.session().sequence().len(), 6);
//!
//! // The owner arms a timer and hands the ticket back when it fires.
//! if let Some(Effect::ScheduleReveal { ticket, .. }) = effects.first() {
//!     engine.reveal_elapsed(*ticket);
//! }
//! assert_eq!(engine.session().phase(), Phase::Playing);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod clock;
mod difficulty;
mod engine;
mod error;
mod event;
mod identity;
mod phase;
mod result;
mod sequence;
mod session;

pub use board::{BOARD_CELLS, BOARD_COLUMNS, BOARD_ROWS, Cell};
pub use clock::{Clock, ManualClock, SystemClock};
pub use difficulty::Difficulty;
pub use engine::{GameEngine, REVEAL_DURATION};
pub use error::BoardError;
pub use event::{Effect, GameEvent, RevealTicket, SessionId};
pub use identity::{Anonymous, IdentityProvider, SharedIdentity, UserId};
pub use phase::Phase;
pub use result::{GameResult, duration_seconds};
pub use sequence::{Sequence, SequenceSource, ShuffledSequences};
pub use session::{Environment, GameSession, Transition};
