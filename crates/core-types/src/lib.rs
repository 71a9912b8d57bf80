pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::check_date_format;
pub use enums::{EntityType, MatchStatus, TrendPeriod};
pub use error::CoreError;
pub use structs::{
    AuthResponse, DashboardData, DashboardSummary, LeagueTable, Match, PerformanceTrends, Player,
    PositionCount, ProfileResponse, StandingRow, Team, TeamStatistics, TopScorer, User,
};
