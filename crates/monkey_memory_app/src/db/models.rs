//! Database models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use monkey_memory::{Difficulty, GameResult};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};

/// User profile database model.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    display_name: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    display_name: String,
}

/// One recorded game.
///
/// Also the JSON shape exchanged with the remote stats backend, where
/// `created_at` travels as an ISO-8601 UTC timestamp. The backend may send
/// `null` or omit `id`, `game_duration`, `difficulty` and `created_at`; those
/// fall back to zero, an empty string and the Unix epoch.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    Getters,
    Serialize,
    Deserialize,
    new,
)]
#[diesel(table_name = schema::game_scores)]
#[diesel(belongs_to(User))]
pub struct GameScore {
    #[serde(default, deserialize_with = "null_as_default")]
    id: i32,
    user_id: i32,
    score: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    game_duration: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    difficulty: String,
    #[serde(default, with = "utc_timestamp")]
    created_at: NaiveDateTime,
}

impl GameScore {
    /// Parses the stored difficulty string.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored value is not a known difficulty.
    #[instrument(skip(self), fields(difficulty = %self.difficulty))]
    pub fn parse_difficulty(&self) -> Result<Difficulty, DbError> {
        Difficulty::from_str(&self.difficulty).map_err(|_| {
            DbError::new(
                DbErrorKind::InvalidData,
                format!("Invalid difficulty: '{}'", self.difficulty),
            )
        })
    }
}

/// Insertable score row for recording a finished game.
#[derive(Debug, Clone, PartialEq, Insertable, new, Getters)]
#[diesel(table_name = schema::game_scores)]
pub struct NewGameScore {
    user_id: i32,
    score: i32,
    game_duration: i32,
    difficulty: String,
    created_at: NaiveDateTime,
}

impl From<&GameResult> for NewGameScore {
    fn from(result: &GameResult) -> Self {
        Self {
            user_id: *result.user_id(),
            score: i32::try_from(*result.score()).unwrap_or(i32::MAX),
            game_duration: i32::try_from(*result.game_duration()).unwrap_or(i32::MAX),
            difficulty: result.difficulty().as_str().to_string(),
            created_at: result.created_at().naive_utc(),
        }
    }
}

/// Reads an optional JSON value, treating `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde adapter: naive UTC timestamps as RFC 3339 strings.
///
/// Accepts both offset-carrying timestamps and bare `YYYY-MM-DDTHH:MM:SS`;
/// `null` reads as the Unix epoch.
mod utc_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(NaiveDateTime::default());
        };
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc).naive_utc());
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn new_score_from_result() {
        let created_at = DateTime::parse_from_rfc3339("2024-03-01T12:00:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = GameResult::new(9, 6, 31, Difficulty::Hard, created_at);
        let row = NewGameScore::from(&result);
        assert_eq!(*row.user_id(), 9);
        assert_eq!(*row.score(), 6);
        assert_eq!(*row.game_duration(), 31);
        assert_eq!(row.difficulty(), "hard");
        assert_eq!(*row.created_at(), created_at.naive_utc());
    }

    #[test]
    fn score_json_accepts_offset_and_naive_timestamps() {
        let with_offset: GameScore = serde_json::from_str(
            r#"{"id":1,"user_id":2,"score":5,"game_duration":10,"difficulty":"easy","created_at":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        let naive: GameScore = serde_json::from_str(
            r#"{"user_id":2,"score":5,"created_at":"2024-03-01T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(with_offset.created_at(), naive.created_at());
        assert_eq!(*naive.id(), 0);
        assert!(naive.parse_difficulty().is_err());
        assert_eq!(with_offset.parse_difficulty().unwrap(), Difficulty::Easy);

        let json = serde_json::to_value(&with_offset).unwrap();
        assert_eq!(json["created_at"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn score_json_accepts_null_optional_fields() {
        let nulls: GameScore = serde_json::from_str(
            r#"{"id":1,"user_id":2,"score":5,"game_duration":null,"difficulty":null,"created_at":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(*nulls.game_duration(), 0);
        assert_eq!(nulls.difficulty(), "");
        assert_eq!(*nulls.score(), 5);

        let bare: GameScore =
            serde_json::from_str(r#"{"id":null,"user_id":2,"score":3}"#).unwrap();
        assert_eq!(*bare.id(), 0);
        assert_eq!(*bare.created_at(), NaiveDateTime::default());

        let null_time: GameScore =
            serde_json::from_str(r#"{"user_id":2,"score":3,"created_at":null}"#).unwrap();
        assert_eq!(null_time.created_at(), bare.created_at());
    }
}
