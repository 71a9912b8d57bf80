use crate::error::AnalyticsError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::check_date_format;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Write};
use std::str::FromStr;

/// Text shown for dates that cannot be parsed, as browsers render them.
pub const INVALID_DATE: &str = "Invalid Date";

/// Default `fullMark` of a radar axis.
pub const DEFAULT_FULL_MARK: u32 = 100;

/// Default date pattern for line charts (day/month/year).
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// The chart shapes the formatter knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Radar,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Radar => "radar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "radar" => Ok(ChartKind::Radar),
            other => Err(AnalyticsError::UnknownChartKind(other.to_string())),
        }
    }
}

// --- Output shapes ---
// Fields missing on the input record are left out of the output.

#[derive(Serialize)]
struct NamedPoint<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
}

#[derive(Serialize)]
struct DatedPoint<'a> {
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
}

#[derive(Serialize)]
struct RadarPoint<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a Value>,
    #[serde(rename = "A", skip_serializing_if = "Option::is_none")]
    a: Option<&'a Value>,
    #[serde(rename = "B", skip_serializing_if = "Option::is_none")]
    b: Option<&'a Value>,
    #[serde(rename = "fullMark")]
    full_mark: Value,
}

/// Reshapes generic `{label, value}` records into the field names each chart kind expects.
#[derive(Debug, Clone)]
pub struct ChartFormatter {
    date_format: String,
}

impl Default for ChartFormatter {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ChartFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom `strftime` pattern for line-chart dates.
    ///
    /// Patterns that cannot render a plain date (including any time specifier)
    /// are rejected up front instead of producing `Invalid Date` for every point.
    pub fn with_date_format(pattern: &str) -> Result<Self, AnalyticsError> {
        if check_date_format(pattern).is_err() {
            return Err(AnalyticsError::InvalidDateFormat(pattern.to_string()));
        }
        Ok(Self {
            date_format: pattern.to_string(),
        })
    }

    /// Formats `data` for the chart named `kind`; unknown kinds get `data` back untouched.
    pub fn format(&self, data: Vec<Value>, kind: &str) -> Vec<Value> {
        match kind.parse::<ChartKind>() {
            Ok(kind) => self.format_kind(&data, kind),
            Err(_) => {
                tracing::trace!(kind, "Unknown chart kind, passing data through.");
                data
            }
        }
    }

    pub fn format_kind(&self, data: &[Value], kind: ChartKind) -> Vec<Value> {
        data.iter()
            .map(|item| match kind {
                ChartKind::Bar | ChartKind::Pie => to_value(&NamedPoint {
                    name: item.get("label"),
                    value: item.get("value"),
                }),
                ChartKind::Line => to_value(&DatedPoint {
                    date: self.format_date(item.get("date")),
                    value: item.get("value"),
                }),
                ChartKind::Radar => to_value(&RadarPoint {
                    subject: item.get("label"),
                    a: item.get("valueA"),
                    b: item.get("valueB"),
                    full_mark: full_mark(item.get("maxValue")),
                }),
            })
            .collect()
    }

    /// Renders a date-like JSON value with the configured pattern.
    pub fn format_date(&self, value: Option<&Value>) -> String {
        let Some(date) = value.and_then(parse_date) else {
            return INVALID_DATE.to_string();
        };
        let mut out = String::new();
        match write!(out, "{}", date.format(&self.date_format)) {
            Ok(()) => out,
            Err(_) => INVALID_DATE.to_string(),
        }
    }
}

/// Formats `data` for the chart named `kind` with the default date pattern.
pub fn format_chart_data(data: Vec<Value>, kind: &str) -> Vec<Value> {
    ChartFormatter::default().format(data, kind)
}

fn to_value<T: Serialize>(point: &T) -> Value {
    // Serializing these plain structs into a `Value` cannot fail.
    serde_json::to_value(point).unwrap_or(Value::Null)
}

/// `maxValue` falls back to 100 when it is absent or falsy.
fn full_mark(max_value: Option<&Value>) -> Value {
    let falsy = match max_value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|v| v == 0.0 || v.is_nan()),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    match max_value {
        Some(v) if !falsy => v.clone(),
        _ => Value::from(DEFAULT_FULL_MARK),
    }
}

/// Accepts RFC 3339, ISO date-times without an offset, plain ISO dates,
/// and epoch milliseconds.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.date_naive());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt.date());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt.date());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
        }
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Value> {
        vec![
            json!({"label": "Benfica", "value": 12, "date": "2024-03-02T15:00:00"}),
            json!({"label": "Porto", "value": 9, "date": "2024-03-09"}),
        ]
    }

    #[test]
    fn bar_and_pie_map_label_to_name() {
        let expected = vec![
            json!({"name": "Benfica", "value": 12}),
            json!({"name": "Porto", "value": 9}),
        ];
        assert_eq!(format_chart_data(sample(), "bar"), expected);
        assert_eq!(format_chart_data(sample(), "pie"), expected);
    }

    #[test]
    fn line_formats_dates() {
        let out = format_chart_data(sample(), "line");
        assert_eq!(out[0], json!({"date": "02/03/2024", "value": 12}));
        assert_eq!(out[1], json!({"date": "09/03/2024", "value": 9}));
    }

    #[test]
    fn line_accepts_offsets_and_epoch_millis() {
        let data = vec![
            json!({"date": "2024-03-02T23:30:00+01:00", "value": 1}),
            json!({"date": 1_709_337_600_000i64, "value": 2}),
            json!({"date": "yesterday", "value": 3}),
            json!({"value": 4}),
        ];
        let out = format_chart_data(data, "line");
        assert_eq!(out[0]["date"], "02/03/2024");
        assert_eq!(out[1]["date"], "02/03/2024");
        assert_eq!(out[2]["date"], INVALID_DATE);
        assert_eq!(out[3]["date"], INVALID_DATE);
    }

    #[test]
    fn custom_date_format_is_used() {
        let formatter = ChartFormatter::with_date_format("%Y-%m-%d").unwrap();
        let out = formatter.format(sample(), "line");
        assert_eq!(out[1]["date"], "2024-03-09");
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        assert!(matches!(
            ChartFormatter::with_date_format("%Q"),
            Err(AnalyticsError::InvalidDateFormat(_))
        ));
        // Dates have no time of day to render.
        assert!(matches!(
            ChartFormatter::with_date_format("%d/%m %H:%M"),
            Err(AnalyticsError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn radar_defaults_full_mark() {
        let data = vec![
            json!({"label": "Attack", "valueA": 80, "valueB": 65, "maxValue": 90}),
            json!({"label": "Defence", "valueA": 70, "valueB": 75}),
            json!({"label": "Possession", "valueA": 55, "valueB": 45, "maxValue": 0}),
        ];
        let out = format_chart_data(data, "radar");
        assert_eq!(out[0], json!({"subject": "Attack", "A": 80, "B": 65, "fullMark": 90}));
        assert_eq!(out[1], json!({"subject": "Defence", "A": 70, "B": 75, "fullMark": 100}));
        assert_eq!(out[2]["fullMark"], 100);
    }

    #[test]
    fn unknown_kind_is_identity() {
        let data = sample();
        assert_eq!(format_chart_data(data.clone(), "unknown-kind"), data);
        assert_eq!(format_chart_data(data.clone(), "BAR"), data);
    }

    #[test]
    fn missing_fields_are_omitted() {
        let out = format_chart_data(vec![json!({"value": 3}), json!(42)], "bar");
        assert_eq!(out, vec![json!({"value": 3}), json!({})]);
    }

    #[test]
    fn chart_kind_round_trips_through_its_name() {
        for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::Pie, ChartKind::Radar] {
            assert_eq!(kind.as_str().parse::<ChartKind>().unwrap(), kind);
        }
    }
}
