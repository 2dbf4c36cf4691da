//! Database persistence layer for user profiles and game scores.

mod error;
mod models;
mod repository;
mod schema;

pub use error::{DbError, DbErrorKind};
pub use models::{GameScore, NewGameScore, User};
pub use repository::{GameRepository, MIGRATIONS};
