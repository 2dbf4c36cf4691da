//! Difficulty levels and the sequence lengths they imply.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Difficulty chosen before a game starts.
///
/// Serialized in lowercase (`"easy"`, `"medium"`, `"hard"`), which is also
/// the form stored in the database and sent to the stats backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Starts at four cells, grows by one per round.
    #[default]
    Easy,
    /// Starts at six cells, grows by two per round.
    Medium,
    /// Starts at eight cells, grows by two per round.
    Hard,
}

impl Difficulty {
    /// Sequence length of the first round.
    #[instrument]
    pub fn initial_length(self) -> usize {
        match self {
            Self::Easy => 4,
            Self::Medium => 6,
            Self::Hard => 8,
        }
    }

    /// Number of cells added after each completed round.
    #[instrument]
    pub fn growth(self) -> usize {
        match self {
            Self::Easy => 1,
            Self::Medium | Self::Hard => 2,
        }
    }

    /// Sequence length of the round following one of `current` cells.
    #[instrument]
    pub fn next_length(self, current: usize) -> usize {
        current + self.growth()
    }

    /// Returns the lowercase wire name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns the menu label shown on the setup screen.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy (4-6 items)",
            Self::Medium => "Medium (6-10 items)",
            Self::Hard => "Hard (8-14 items)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn lengths_per_difficulty() {
        assert_eq!(Difficulty::Easy.initial_length(), 4);
        assert_eq!(Difficulty::Medium.initial_length(), 6);
        assert_eq!(Difficulty::Hard.initial_length(), 8);
        assert_eq!(Difficulty::Easy.next_length(4), 5);
        assert_eq!(Difficulty::Medium.next_length(6), 8);
        assert_eq!(Difficulty::Hard.next_length(8), 10);
    }

    #[test]
    fn wire_names_are_lowercase() {
        for difficulty in Difficulty::iter() {
            let json = serde_json::to_string(&difficulty).unwrap();
            assert_eq!(json, format!("\"{}\"", difficulty.as_str()));
            assert_eq!(difficulty.to_string(), difficulty.as_str());
        }
        assert_eq!(Difficulty::from_str("Hard"), Ok(Difficulty::Hard));
        assert!(Difficulty::from_str("extreme").is_err());
    }
}
