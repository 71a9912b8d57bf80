use crate::stats::StatsSummary;
use serde::{Deserialize, Serialize};

/// Summary of one metric over one time series.
///
/// This is the data behind a "performance trend" view: the headline
/// average/max/min plus the direction over the most recent matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    /// Field name the report was computed for (e.g. "goals").
    pub metric: String,
    /// Number of records carrying a valid value for the metric.
    pub observations: usize,
    pub summary: StatsSummary,
    /// Signed percentage change over the trailing window.
    pub trend_pct: f64,
    /// Window size the trend was computed with.
    pub window: usize,
}

impl MetricReport {
    /// Creates an empty report for `metric`.
    pub fn new(metric: &str, window: usize) -> Self {
        Self {
            metric: metric.to_string(),
            observations: 0,
            summary: StatsSummary::ZERO,
            trend_pct: 0.0,
            window,
        }
    }

    /// Direction of the trend as a single glyph for compact displays.
    pub fn direction(&self) -> &'static str {
        if self.trend_pct > 0.0 {
            "▲"
        } else if self.trend_pct < 0.0 {
            "▼"
        } else {
            "="
        }
    }
}
