//! Finalized result of a game, as submitted to the stats service.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{Difficulty, UserId};

/// Immutable snapshot of a finished game.
///
/// Field names follow the stats backend's JSON (`game_duration` is whole
/// seconds, `created_at` is an ISO-8601 timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct GameResult {
    user_id: UserId,
    score: u32,
    game_duration: u64,
    difficulty: Difficulty,
    created_at: DateTime<Utc>,
}

/// Whole seconds between `start` and `end`, rounded to nearest.
pub fn duration_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let millis = (end - start).num_milliseconds().max(0);
    u64::try_from((millis + 500) / 1000).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn duration_rounds_to_nearest_second() {
        let start = Utc::now();
        assert_eq!(duration_seconds(start, start + TimeDelta::milliseconds(1499)), 1);
        assert_eq!(duration_seconds(start, start + TimeDelta::milliseconds(1500)), 2);
        assert_eq!(duration_seconds(start, start - TimeDelta::seconds(3)), 0);
    }

    #[test]
    fn serializes_backend_field_names() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = GameResult::new(3, 7, 42, Difficulty::Medium, created_at);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["user_id"], 3);
        assert_eq!(json["score"], 7);
        assert_eq!(json["game_duration"], 42);
        assert_eq!(json["difficulty"], "medium");
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
    }
}
