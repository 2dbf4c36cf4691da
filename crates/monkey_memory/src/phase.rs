//! Phases of a game session.

use serde::{Deserialize, Serialize};

/// Phase of the live game session.
///
/// ```text
/// Waiting --start--> Showing --reveal elapsed--> Playing --wrong cell--> Finished
///                       ^                           |                        |
///                       +------- round complete ----+                        |
///                       +----------------------- play again -----------------+
/// ```
///
/// Any phase returns to `Waiting` on reset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Choosing a difficulty; no sequence yet.
    #[default]
    Waiting,
    /// The sequence is on display.
    Showing,
    /// The player is entering the sequence.
    Playing,
    /// The player clicked a wrong cell; the result is final.
    Finished,
}
