use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Unknown chart kind '{0}' (expected bar, line, pie or radar)")]
    UnknownChartKind(String),

    #[error("Invalid date format pattern: {0}")]
    InvalidDateFormat(String),

    #[error("Trend window must cover at least 2 periods, got {0}")]
    InvalidWindow(usize),
}
