use crate::requests::{
    LeagueTableQuery, LoginRequest, PlayerComparisonQuery, RegisterRequest, TeamComparisonQuery,
};
use crate::responses::{error_message, unwrap_envelope};
use async_trait::async_trait;
use configuration::ApiSettings;
use core_types::{
    AuthResponse, DashboardData, LeagueTable, Match, PerformanceTrends, Player, ProfileResponse,
    Team, TeamStatistics, User,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub mod error;
pub mod requests;
pub mod responses;
pub mod session;
// --- Public API ---
pub use error::{ApiError, ErrorPayload, SessionError, CONNECTION_ERROR_MESSAGE};
pub use requests::{MatchFilters, PerformanceQuery, PlayerFilters, ProfileUpdate};
pub use session::{AuthSession, FileSessionStore, MemorySessionStore, Session, SessionStore};

/// The abstract interface to the analytics backend.
///
/// The application shell only talks to this trait, so the HTTP implementation can be
/// swapped for a fake in tests. Every call is a single attempt; failures surface as
/// [`ApiError`], with [`ApiError::Unauthorized`] meaning the session is gone.
#[async_trait]
pub trait SportsApi: Send + Sync {
    // --- Authentication ---
    /// Logs in and stores the returned session.
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    /// Creates an account and stores the returned session.
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
    /// Fetches the logged-in user's profile. (Authenticated)
    async fn profile(&self) -> Result<User, ApiError>;
    /// Updates the logged-in user's profile and the stored user. (Authenticated)
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError>;

    // --- Teams ---
    async fn teams(&self) -> Result<Vec<Team>, ApiError>;
    async fn team(&self, id: i64) -> Result<Team, ApiError>;
    async fn team_players(&self, id: i64) -> Result<Vec<Player>, ApiError>;
    async fn team_matches(&self, id: i64) -> Result<Vec<Match>, ApiError>;
    async fn team_statistics(&self, id: i64) -> Result<TeamStatistics, ApiError>;

    // --- Players ---
    async fn players(&self, filters: &PlayerFilters) -> Result<Vec<Player>, ApiError>;
    async fn player(&self, id: i64) -> Result<Player, ApiError>;
    async fn player_statistics(&self, id: i64) -> Result<Value, ApiError>;
    async fn player_performance(&self, id: i64) -> Result<Value, ApiError>;

    // --- Matches ---
    async fn matches(&self, filters: &MatchFilters) -> Result<Vec<Match>, ApiError>;
    async fn match_details(&self, id: i64) -> Result<Match, ApiError>;
    async fn match_statistics(&self, id: i64) -> Result<Value, ApiError>;
    async fn match_timeline(&self, id: i64) -> Result<Value, ApiError>;

    // --- Analytics ---
    async fn dashboard(&self) -> Result<DashboardData, ApiError>;
    async fn compare_teams(&self, team1_id: i64, team2_id: i64) -> Result<Value, ApiError>;
    async fn compare_players(&self, player1_id: i64, player2_id: i64) -> Result<Value, ApiError>;
    async fn league_table(&self, league: &str, season: &str) -> Result<LeagueTable, ApiError>;
    async fn performance_trends(&self, query: &PerformanceQuery) -> Result<PerformanceTrends, ApiError>;

    async fn health(&self) -> Result<Value, ApiError>;
}

/// The reqwest-backed implementation of [`SportsApi`].
#[derive(Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<AuthSession>,
}

impl DashboardClient {
    pub fn new(settings: &ApiSettings, session: Arc<AuthSession>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Sends one request and decodes the JSON response.
    ///
    /// The bearer token is attached when a session exists. A 401 clears the session
    /// before the error is returned.
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<String>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = match query.as_deref() {
            Some(qs) if !qs.is_empty() => format!("{}{}?{}", self.base_url, path, qs),
            _ => format!("{}{}", self.base_url, path),
        };
        tracing::debug!(%method, %url, "Sending API request.");

        let mut request = self.client.request(method, &url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "API request failed before a response arrived.");
            ApiError::Connection(e)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str::<T>(&text).map_err(|e| {
                ApiError::Deserialization(format!("{} (url: {}, body: {})", e, url, text))
            });
        }

        let message = error_message(status, &text);
        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.session.clear() {
                tracing::error!(error = %e, "Failed to clear the session after a 401.");
            }
            return Err(ApiError::Unauthorized(message));
        }

        tracing::debug!(%url, status = status.as_u16(), %message, "API returned an error.");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, None, None).await
    }

    async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let qs = serde_qs::to_string(query).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.send::<T, ()>(Method::GET, path, Some(qs), None).await
    }

    /// GETs `path` and unwraps the `{"<key>": ...}` envelope around the payload.
    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ApiError> {
        self.get_enveloped_with_query::<T, ()>(path, None, key).await
    }

    async fn get_enveloped_with_query<T, Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        key: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let body: Value = match query {
            Some(query) => self.get_with_query(path, query).await?,
            None => self.get(path).await?,
        };
        serde_json::from_value(unwrap_envelope(body, key))
            .map_err(|e| ApiError::Deserialization(format!("{} (field: {})", e, key)))
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, None, Some(body)).await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, path, None, Some(body)).await
    }

    /// Stores the session carried by a login/register response, if any.
    fn remember(&self, response: &AuthResponse) -> Result<(), ApiError> {
        if let Some(token) = &response.access_token {
            self.session.login(Session {
                token: token.clone(),
                user: response.user.clone(),
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl SportsApi for DashboardClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.post("/auth/login", &LoginRequest { email, password }).await?;
        self.remember(&response)?;
        Ok(response)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest { username, email, password };
        let response: AuthResponse = self.post("/auth/register", &body).await?;
        self.remember(&response)?;
        Ok(response)
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.get_enveloped("/auth/me", "user").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileResponse, ApiError> {
        let response: ProfileResponse = self.patch("/auth/me", update).await?;
        self.session.update_user(response.user.clone())?;
        Ok(response)
    }

    async fn teams(&self) -> Result<Vec<Team>, ApiError> {
        self.get_enveloped("/teams", "teams").await
    }

    async fn team(&self, id: i64) -> Result<Team, ApiError> {
        self.get_enveloped(&format!("/teams/{}", id), "team").await
    }

    async fn team_players(&self, id: i64) -> Result<Vec<Player>, ApiError> {
        self.get_enveloped(&format!("/teams/{}/players", id), "players").await
    }

    async fn team_matches(&self, id: i64) -> Result<Vec<Match>, ApiError> {
        self.get_enveloped(&format!("/teams/{}/matches", id), "matches").await
    }

    async fn team_statistics(&self, id: i64) -> Result<TeamStatistics, ApiError> {
        self.get(&format!("/teams/{}/statistics", id)).await
    }

    async fn players(&self, filters: &PlayerFilters) -> Result<Vec<Player>, ApiError> {
        self.get_enveloped_with_query("/players", Some(filters), "players").await
    }

    async fn player(&self, id: i64) -> Result<Player, ApiError> {
        self.get_enveloped(&format!("/players/{}", id), "player").await
    }

    async fn player_statistics(&self, id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/players/{}/statistics", id)).await
    }

    async fn player_performance(&self, id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/players/{}/performance", id)).await
    }

    async fn matches(&self, filters: &MatchFilters) -> Result<Vec<Match>, ApiError> {
        self.get_enveloped_with_query("/matches", Some(filters), "matches").await
    }

    async fn match_details(&self, id: i64) -> Result<Match, ApiError> {
        self.get_enveloped(&format!("/matches/{}", id), "match").await
    }

    async fn match_statistics(&self, id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/matches/{}/statistics", id)).await
    }

    async fn match_timeline(&self, id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/matches/{}/timeline", id)).await
    }

    async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        self.get("/analytics/dashboard").await
    }

    async fn compare_teams(&self, team1_id: i64, team2_id: i64) -> Result<Value, ApiError> {
        let query = TeamComparisonQuery { team1_id, team2_id };
        self.get_with_query("/analytics/team-comparison", &query).await
    }

    async fn compare_players(&self, player1_id: i64, player2_id: i64) -> Result<Value, ApiError> {
        let query = PlayerComparisonQuery { player1_id, player2_id };
        self.get_with_query("/analytics/player-comparison", &query).await
    }

    async fn league_table(&self, league: &str, season: &str) -> Result<LeagueTable, ApiError> {
        let query = LeagueTableQuery { league, season };
        self.get_with_query("/analytics/league-table", &query).await
    }

    async fn performance_trends(&self, query: &PerformanceQuery) -> Result<PerformanceTrends, ApiError> {
        self.get_with_query("/analytics/performance-trends", query).await
    }

    async fn health(&self) -> Result<Value, ApiError> {
        self.get("/health").await
    }
}
