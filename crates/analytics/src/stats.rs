use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Min, max, mean and total of one numeric field across a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sum: f64,
}

impl StatsSummary {
    /// The all-zero summary returned when there is nothing to summarize.
    pub const ZERO: StatsSummary = StatsSummary {
        min: 0.0,
        max: 0.0,
        avg: 0.0,
        sum: 0.0,
    };
}

/// Summarizes the `key` field over `records`.
///
/// Records where the field is missing or not a valid number are skipped. If no
/// valid value remains the result is [`StatsSummary::ZERO`].
pub fn summarize<R: Record>(records: &[R], key: &str) -> StatsSummary {
    summarize_values(records.iter().filter_map(|r| r.numeric(key)))
}

/// Summarizes a stream of already-extracted values. Non-finite values are skipped.
pub fn summarize_values<I>(values: I) -> StatsSummary
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for value in values.into_iter().filter(|v| v.is_finite()) {
        count += 1;
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }

    if count == 0 {
        return StatsSummary::ZERO;
    }

    StatsSummary {
        min,
        max,
        avg: sum / count as f64,
        sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn series(values: &[Value]) -> Vec<Value> {
        values.iter().map(|v| json!({ "v": v })).collect()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let empty: Vec<Value> = Vec::new();
        assert_eq!(summarize(&empty, "v"), StatsSummary::ZERO);
    }

    #[test]
    fn only_invalid_values_is_all_zero() {
        let data = series(&[json!(null), json!("abc"), json!(false)]);
        assert_eq!(summarize(&data, "v"), StatsSummary::ZERO);
        assert_eq!(summarize(&data, "other"), StatsSummary::ZERO);
    }

    #[test]
    fn single_value_fills_every_field() {
        let data = series(&[json!(7.5)]);
        let s = summarize(&data, "v");
        assert_eq!(s, StatsSummary { min: 7.5, max: 7.5, avg: 7.5, sum: 7.5 });
    }

    #[test]
    fn invalid_entries_are_ignored() {
        let data = vec![
            json!({"v": 4}),
            json!({"v": "n/a"}),
            json!({"w": 100}),
            json!({"v": 2}),
            json!({"v": "6"}),
        ];
        let s = summarize(&data, "v");
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 6.0);
        assert_eq!(s.sum, 12.0);
        assert_eq!(s.avg, 4.0);
    }

    #[test]
    fn average_lies_between_min_and_max() {
        let samples: [&[f64]; 5] = [
            &[1.0, 2.0, 3.0],
            &[-5.0, 10.0, 0.25],
            &[3.0, 3.0, 3.0, 3.0],
            &[1e9, -1e9, 42.0],
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
        ];
        for sample in samples {
            let s = summarize_values(sample.iter().copied());
            assert!(s.min <= s.avg && s.avg <= s.max, "{:?} -> {:?}", sample, s);
        }
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let s = summarize_values([1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(s, StatsSummary { min: 1.0, max: 3.0, avg: 2.0, sum: 4.0 });
    }
}
