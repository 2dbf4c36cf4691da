//! Personal and overall statistics computed from recorded scores.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::GameScore;

/// Number of recent games kept in a user's score trend.
pub const TREND_LENGTH: usize = 10;

/// Number of days covered by the recent-activity series.
pub const ACTIVITY_DAYS: u64 = 7;

/// Score buckets for the global distribution: `(label, low, high)`, inclusive.
const BUCKETS: [(&str, i32, i32); 5] = [
    ("0-2", 0, 2),
    ("3-5", 3, 5),
    ("6-8", 6, 8),
    ("9-11", 9, 11),
    ("12+", 12, i32::MAX),
];

/// Aggregated statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Owner of the statistics.
    pub user_id: i32,
    /// Highest score.
    pub best_score: i32,
    /// Median score.
    pub median_score: f64,
    /// Mean score.
    pub average_score: f64,
    /// Number of recorded games.
    pub total_games: i64,
    /// Most recent scores, oldest first.
    pub score_trend: Vec<i32>,
}

impl UserStats {
    /// Computes statistics from a user's scores, given oldest first.
    #[instrument(skip(scores), fields(count = scores.len()))]
    pub fn from_scores(user_id: i32, scores: &[GameScore]) -> Self {
        let values: Vec<i32> = scores.iter().map(|s| *s.score()).collect();
        let trend_start = values.len().saturating_sub(TREND_LENGTH);
        Self {
            user_id,
            best_score: values.iter().copied().max().unwrap_or(0),
            median_score: median(&values),
            average_score: mean(&values),
            total_games: values.len() as i64,
            score_trend: values[trend_start..].to_vec(),
        }
    }
}

/// Number of games whose score falls in a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket {
    /// Human-readable range, e.g. `"3-5"`.
    pub score_range: String,
    /// Games in the range.
    pub count: i64,
}

/// Games played on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// Games recorded that day.
    pub games_played: i64,
}

/// Statistics across every player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Number of registered users.
    pub total_users: i64,
    /// Highest score anyone reached.
    pub global_best_score: i32,
    /// Mean over all games.
    pub global_average_score: f64,
    /// Median over all games.
    pub global_median_score: f64,
    /// Games per score bucket.
    pub score_distribution: Vec<ScoreBucket>,
    /// Games per day over the last week, oldest first.
    pub recent_activity: Vec<DailyActivity>,
}

impl OverallStats {
    /// Computes overall statistics; `today` anchors the activity window.
    #[instrument(skip(scores), fields(count = scores.len()))]
    pub fn from_scores(total_users: i64, scores: &[GameScore], today: NaiveDate) -> Self {
        let values: Vec<i32> = scores.iter().map(|s| *s.score()).collect();

        let score_distribution = BUCKETS
            .iter()
            .map(|(label, low, high)| ScoreBucket {
                score_range: (*label).to_string(),
                count: values.iter().filter(|v| (*low..=*high).contains(*v)).count() as i64,
            })
            .collect();

        let recent_activity = (0..ACTIVITY_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| DailyActivity {
                date,
                games_played: scores
                    .iter()
                    .filter(|s| s.created_at().date() == date)
                    .count() as i64,
            })
            .collect();

        Self {
            total_users,
            global_best_score: values.iter().copied().max().unwrap_or(0),
            global_average_score: mean(&values),
            global_median_score: median(&values),
            score_distribution,
            recent_activity,
        }
    }
}

/// Change between the first and last of the most recent games.
///
/// Scores are given oldest first; fewer than two games means no change.
pub fn score_improvement(scores: &[GameScore]) -> i32 {
    let recent = &scores[scores.len().saturating_sub(TREND_LENGTH)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if recent.len() >= 2 => last.score() - first.score(),
        _ => 0,
    }
}

/// Rough percentile of a player from their average against the global one.
///
/// Clamped to `5..=95`; `None` when there is no global average to compare with.
pub fn estimate_percentile(user_average: f64, global_average: f64) -> Option<f64> {
    if global_average <= 0.0 {
        return None;
    }
    let relative = (user_average - global_average).abs() / global_average * 50.0;
    let percentile = if user_average > global_average {
        (50.0 + relative).min(95.0)
    } else {
        (50.0 - relative).max(5.0)
    };
    Some(percentile)
}

/// How a player's average compares with typical primate recall.
///
/// Monkeys typically hold four to seven items; humans seven plus or minus two.
pub fn memory_verdict(average_score: f64) -> &'static str {
    if average_score > 7.0 {
        "Human-level memory: you are beyond the typical monkey range."
    } else if average_score > 5.0 {
        "Solid recall: right in the upper monkey range."
    } else {
        "Monkey-level recall so far. Keep practising!"
    }
}

fn mean(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64
}

fn median(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    }
}
