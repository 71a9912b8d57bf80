use crate::error::ConfigError;
use core_types::TrendPeriod;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections fall back to
/// the defaults below, which match a backend running locally.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
}

/// Connection parameters for the analytics REST backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to (e.g. "http://localhost:5000/api").
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Where the authenticated session is persisted between runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub path: PathBuf,
}

/// Parameters for the trend and chart helpers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Size of the trailing window the trend is computed over.
    pub trend_periods: usize,
    /// `strftime` pattern used for line-chart dates.
    pub date_format: String,
    /// Period requested when none is given on the command line.
    pub default_period: TrendPeriod,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set (e.g. "info", "api_client=debug").
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".pitchside/session.json"),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            trend_periods: 5,
            date_format: "%d/%m/%Y".to_string(),
            default_period: TrendPeriod::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Rejects values that would make the client or the analytics helpers misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Err(e) = core_types::check_date_format(&self.analytics.date_format) {
            return Err(ConfigError::ValidationError(format!("analytics.date_format: {}", e)));
        }
        if self.analytics.trend_periods < 2 {
            return Err(ConfigError::ValidationError(format!(
                "analytics.trend_periods must be at least 2, got {}",
                self.analytics.trend_periods
            )));
        }
        Ok(())
    }
}
