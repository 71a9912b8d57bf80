//! # Pitchside Analytics
//!
//! Pure helpers that turn time series fetched from the backend into the numbers and
//! shapes the dashboard displays.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and depends
//!   only on `core-types` (Layer 0).
//! - **Fallbacks, not failures:** degenerate input (empty series, a zero baseline,
//!   an unknown chart kind) produces a defined value instead of an error.
//!
//! ## Public API
//!
//! - `summarize` / `StatsSummary`: min, max, average and sum of a numeric field.
//! - `calculate_trend`: percentage change over a trailing window.
//! - `format_chart_data` / `ChartFormatter`: reshape records per chart kind.
//! - `generate_colors`: series colours from a fixed palette.
//! - `TrendAnalyzer` / `MetricReport`: all of the above for one metric at once.
//! - `line_series`: a performance series as chronological line-chart records.

// Declare the modules that constitute this crate.
pub mod chart;
pub mod engine;
pub mod error;
pub mod palette;
pub mod record;
pub mod report;
pub mod stats;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use chart::{format_chart_data, ChartFormatter, ChartKind};
pub use engine::{line_series, TrendAnalyzer};
pub use error::AnalyticsError;
pub use palette::{generate_colors, generate_colors_with, BASE_PALETTE};
pub use record::Record;
pub use report::MetricReport;
pub use stats::{summarize, StatsSummary};
pub use trend::{calculate_trend, trend, DEFAULT_TREND_PERIODS};
