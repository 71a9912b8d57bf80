use core_types::{EntityType, MatchStatus, TrendPeriod};
use serde::Serialize;

// Bodies and query strings sent to the backend. Optional fields are left out
// entirely when unset, which the backend treats as "no filter".

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Fields of the own profile to change with `PATCH /auth/me`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Filters for `GET /players`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

/// Filters for `GET /matches`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

/// Parameters of `GET /analytics/performance-trends`.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceQuery {
    pub entity_type: EntityType,
    pub entity_id: i64,
    /// Metric name, e.g. "goals", "possession", "shots", "passes" or "tackles".
    pub metric: String,
    pub period: TrendPeriod,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeamComparisonQuery {
    pub team1_id: i64,
    pub team2_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlayerComparisonQuery {
    pub player1_id: i64,
    pub player2_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeagueTableQuery<'a> {
    pub league: &'a str,
    pub season: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_filters_are_omitted() {
        assert_eq!(serde_qs::to_string(&PlayerFilters::default()).unwrap(), "");
        let filters = MatchFilters {
            status: Some(MatchStatus::Completed),
            season: Some("2023/2024".to_string()),
            ..Default::default()
        };
        let qs = serde_qs::to_string(&filters).unwrap();
        assert!(qs.contains("status=completed"), "{}", qs);
        assert!(qs.contains("season=2023"), "{}", qs);
        assert!(!qs.contains("team_id"), "{}", qs);
    }

    #[test]
    fn performance_query_uses_backend_names() {
        let query = PerformanceQuery {
            entity_type: EntityType::Player,
            entity_id: 9,
            metric: "goals".to_string(),
            period: TrendPeriod::Last10,
        };
        assert_eq!(
            serde_qs::to_string(&query).unwrap(),
            "entity_type=player&entity_id=9&metric=goals&period=last_10"
        );
    }
}
