use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a fixture as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
    Postponed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
            MatchStatus::Postponed => "postponed",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "completed" => Ok(MatchStatus::Completed),
            "postponed" => Ok(MatchStatus::Postponed),
            "cancelled" => Ok(MatchStatus::Cancelled),
            other => Err(CoreError::InvalidInput("match status".to_string(), other.to_string())),
        }
    }
}

/// The kind of entity a performance trend is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Team,
    Player,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Team => "team",
            EntityType::Player => "player",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(EntityType::Team),
            "player" => Ok(EntityType::Player),
            other => Err(CoreError::InvalidInput("entity type".to_string(), other.to_string())),
        }
    }
}

/// The span of matches a performance trend covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendPeriod {
    #[serde(rename = "last_5")]
    Last5,
    #[serde(rename = "last_10")]
    Last10,
    #[default]
    #[serde(rename = "season")]
    Season,
}

impl TrendPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Last5 => "last_5",
            TrendPeriod::Last10 => "last_10",
            TrendPeriod::Season => "season",
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_5" | "last5" => Ok(TrendPeriod::Last5),
            "last_10" | "last10" => Ok(TrendPeriod::Last10),
            "season" => Ok(TrendPeriod::Season),
            other => Err(CoreError::InvalidInput("trend period".to_string(), other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_match_status_deserializes_to_unknown() {
        let status: MatchStatus = serde_json::from_str("\"abandoned\"").unwrap();
        assert_eq!(status, MatchStatus::Unknown);
        let status: MatchStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, MatchStatus::Completed);
    }

    #[test]
    fn trend_period_uses_backend_names() {
        assert_eq!(serde_json::to_string(&TrendPeriod::Last10).unwrap(), "\"last_10\"");
        assert_eq!("last_5".parse::<TrendPeriod>().unwrap(), TrendPeriod::Last5);
        assert_eq!(TrendPeriod::default(), TrendPeriod::Season);
    }

    #[test]
    fn parse_errors_name_the_field() {
        let err = "coach".parse::<EntityType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input for entity type: coach");
    }
}
