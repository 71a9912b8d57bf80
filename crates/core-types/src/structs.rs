use crate::enums::MatchStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// The backend serializes timestamps with Python's `isoformat()`, i.e. without an offset,
// so every timestamp here is naive.

/// An account on the analytics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub league: String,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub nationality: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Height in centimetres.
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    pub team_id: i64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub date: NaiveDateTime,
    pub home_team_id: i64,
    pub away_team_id: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub home_score: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub away_score: u32,
    pub season: String,
    pub competition: String,
    #[serde(default)]
    pub venue: Option<String>,
    pub status: MatchStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Match {
    /// Score line as `home-away`, or `vs` when the match has not been played.
    pub fn score_line(&self) -> String {
        match self.status {
            MatchStatus::Completed | MatchStatus::Live => {
                format!("{}-{}", self.home_score, self.away_score)
            }
            _ => "vs".to_string(),
        }
    }
}

/// Scores of unplayed matches may be stored as null.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregated season record of a single team (`GET /teams/:id/statistics`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    pub team_id: i64,
    pub team_name: String,
    pub total_matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub win_percentage: f64,
    /// Recent results, most recent first (`W`, `D`, `L`).
    #[serde(default)]
    pub form: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_teams: u64,
    pub total_players: u64,
    pub total_matches: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopScorer {
    pub player_id: i64,
    pub player_name: String,
    pub team_id: i64,
    pub team_name: String,
    pub goals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCount {
    pub position: String,
    pub count: u32,
}

/// Landing-page overview (`GET /analytics/dashboard`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    #[serde(default)]
    pub recent_matches: Vec<Match>,
    #[serde(default)]
    pub top_scorers: Vec<TopScorer>,
    #[serde(default)]
    pub position_distribution: Vec<PositionCount>,
}

/// One row of a league table. Rows arrive already ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: u32,
    pub team_id: i64,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueTable {
    pub league: String,
    pub season: String,
    #[serde(default)]
    pub table: Vec<StandingRow>,
}

/// Per-match metric history for a team or a player.
///
/// `performance_data` is kept as raw JSON records: the available metrics differ
/// between teams and players, and the analytics layer reads them by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrends {
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub player_id: Option<i64>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default, alias = "trend_data")]
    pub performance_data: Vec<Value>,
}

impl PerformanceTrends {
    /// Display name of the entity the series belongs to.
    pub fn entity_name(&self) -> &str {
        self.player_name
            .as_deref()
            .or(self.team_name.as_deref())
            .unwrap_or("unknown")
    }
}

/// Response of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Response of `PATCH /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}
