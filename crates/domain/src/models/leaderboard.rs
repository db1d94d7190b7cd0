//! Leaderboard domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregation period of a leaderboard snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    AllTime,
}

impl Period {
    /// All periods the aggregator maintains, in refresh order.
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::AllTime];
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::AllTime => write!(f, "all_time"),
        }
    }
}

/// Persisted aggregate for one profile in one family period window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub id: Uuid,
    pub family_id: Uuid,
    pub period: Period,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub profile_id: Uuid,
    pub points: i64,
    pub chores_completed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_completion: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ranked row served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub profile_id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub points: i64,
    pub chores_completed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_completion: Option<DateTime<Utc>>,
}

/// Query parameters for the leaderboard read endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaderboardQuery {
    #[serde(default = "default_period")]
    pub period: Period,
}

fn default_period() -> Period {
    Period::Week
}

/// Leaderboard read response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub period: Period,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    /// True when no snapshot existed and the board was computed live.
    pub realtime: bool,
    pub entries: Vec<LeaderboardEntry>,
}

/// Per-family-period summary returned by the refresh endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedPeriod {
    pub family: Uuid,
    pub period: Period,
    pub entries: usize,
}

/// Response of the leaderboard refresh endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshLeaderboardResponse {
    pub success: bool,
    pub processed: Vec<RefreshedPeriod>,
}
