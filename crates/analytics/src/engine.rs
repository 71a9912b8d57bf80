use crate::error::AnalyticsError;
use crate::record::{value_as_number, Record};
use crate::report::MetricReport;
use crate::stats::summarize;
use crate::trend::{calculate_trend, DEFAULT_TREND_PERIODS};
use core_types::PerformanceTrends;
use serde_json::{json, Value};

/// A stateless calculator for deriving metric reports from time series.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    periods: usize,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self {
            periods: DEFAULT_TREND_PERIODS,
        }
    }
}

impl TrendAnalyzer {
    /// Creates an analyzer whose trends look at the last `periods` records.
    pub fn new(periods: usize) -> Result<Self, AnalyticsError> {
        if periods < 2 {
            return Err(AnalyticsError::InvalidWindow(periods));
        }
        Ok(Self { periods })
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Computes the report for `metric` over `records`, which must be in time order.
    pub fn report<R: Record>(&self, records: &[R], metric: &str) -> MetricReport {
        let mut report = MetricReport::new(metric, self.periods);

        report.observations = records.iter().filter(|r| r.numeric(metric).is_some()).count();
        if report.observations == 0 {
            tracing::debug!(metric, records = records.len(), "No valid values for metric.");
            return report;
        }

        report.summary = summarize(records, metric);
        report.trend_pct = calculate_trend(records, metric, self.periods);
        report
    }

    /// Computes the report for `metric` over a backend performance series.
    ///
    /// The backend lists matches most recent first; the series is reversed so that
    /// the trend runs from oldest to newest.
    pub fn analyze(&self, trends: &PerformanceTrends, metric: &str) -> MetricReport {
        let chronological: Vec<_> = trends.performance_data.iter().rev().map(SeriesPoint).collect();
        self.report(&chronological, metric)
    }
}

/// Turns a backend performance series into chronological `{date, value}` records,
/// ready for the line chart formatter.
pub fn line_series(trends: &PerformanceTrends, metric: &str) -> Vec<Value> {
    trends
        .performance_data
        .iter()
        .rev()
        .map(|record| {
            let point = SeriesPoint(record);
            json!({
                "date": point.date().cloned().unwrap_or(Value::Null),
                "value": point.metric(metric).cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

/// One entry of a performance series.
///
/// Entries come either as `{date, <metric>: n, ...}` or in the condensed
/// `{match_date, value}` form, where `value` holds the requested metric.
struct SeriesPoint<'a>(&'a Value);

impl SeriesPoint<'_> {
    fn date(&self) -> Option<&Value> {
        self.0.get("date").or_else(|| self.0.get("match_date"))
    }

    fn metric(&self, metric: &str) -> Option<&Value> {
        self.0.get(metric).or_else(|| self.0.get("value"))
    }
}

impl Record for SeriesPoint<'_> {
    fn numeric(&self, key: &str) -> Option<f64> {
        self.metric(key).and_then(value_as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_windows_below_two() {
        assert!(matches!(TrendAnalyzer::new(1), Err(AnalyticsError::InvalidWindow(1))));
        assert_eq!(TrendAnalyzer::new(3).unwrap().periods(), 3);
        assert_eq!(TrendAnalyzer::default().periods(), DEFAULT_TREND_PERIODS);
    }

    #[test]
    fn report_combines_summary_and_trend() {
        let data = vec![
            json!({"goals": 1}),
            json!({"goals": 0}),
            json!({"goals": 2}),
            json!({"goals": 2}),
        ];
        let report = TrendAnalyzer::new(3).unwrap().report(&data, "goals");
        assert_eq!(report.observations, 4);
        assert_eq!(report.summary.sum, 5.0);
        assert_eq!(report.summary.max, 2.0);
        // Window [0, 2, 2]: zero start with an increase saturates.
        assert_eq!(report.trend_pct, 100.0);
        assert_eq!(report.direction(), "▲");
    }

    #[test]
    fn empty_metric_yields_zero_report() {
        let data = vec![json!({"shots": 4}), json!({"shots": 6})];
        let report = TrendAnalyzer::default().report(&data, "goals");
        assert_eq!(report, MetricReport::new("goals", DEFAULT_TREND_PERIODS));
        assert_eq!(report.direction(), "=");
    }

    #[test]
    fn analyze_reads_backend_order_newest_first() {
        let trends: PerformanceTrends = serde_json::from_value(json!({
            "team_id": 1,
            "team_name": "Sporting CP",
            "performance_data": [
                {"date": "2024-03-09T15:00:00", "goals_scored": 1},
                {"date": "2024-03-02T15:00:00", "goals_scored": 2}
            ]
        }))
        .unwrap();
        let report = TrendAnalyzer::default().analyze(&trends, "goals_scored");
        assert_eq!(report.trend_pct, -50.0);
        assert_eq!(report.direction(), "▼");
    }

    #[test]
    fn condensed_series_reads_value_and_match_date() {
        let trends: PerformanceTrends = serde_json::from_value(json!({
            "player_id": 9,
            "player_name": "Rui Costa",
            "trend_data": [
                {"match_date": "2024-03-09T15:00:00", "value": 4},
                {"match_date": "2024-03-02T15:00:00", "value": 2}
            ]
        }))
        .unwrap();

        let report = TrendAnalyzer::default().analyze(&trends, "goals");
        assert_eq!(report.observations, 2);
        assert_eq!(report.summary.sum, 6.0);
        assert_eq!(report.trend_pct, 100.0);

        let points = line_series(&trends, "goals");
        assert_eq!(points[0], json!({"date": "2024-03-02T15:00:00", "value": 2}));
        assert_eq!(points[1], json!({"date": "2024-03-09T15:00:00", "value": 4}));
    }

    #[test]
    fn line_series_prefers_the_named_metric() {
        let trends: PerformanceTrends = serde_json::from_value(json!({
            "team_id": 1,
            "performance_data": [
                {"date": "2024-03-09T15:00:00", "possession": 61.5, "value": 1},
                {"date": "2024-03-02T15:00:00"}
            ]
        }))
        .unwrap();
        let points = line_series(&trends, "possession");
        assert_eq!(points[0], json!({"date": "2024-03-02T15:00:00", "value": null}));
        assert_eq!(points[1]["value"], json!(61.5));
    }
}
