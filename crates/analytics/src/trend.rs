use crate::record::Record;

/// Window size used when the caller does not pick one.
pub const DEFAULT_TREND_PERIODS: usize = 5;

/// Percentage change of `key` over the last [`DEFAULT_TREND_PERIODS`] records.
pub fn trend<R: Record>(records: &[R], key: &str) -> f64 {
    calculate_trend(records, key, DEFAULT_TREND_PERIODS)
}

/// Percentage change of `key` between the first and last record of the trailing
/// window of `periods` records.
///
/// Returns `0.0` when fewer than two records fall in the window. A zero starting value
/// saturates to `100.0` for any increase and `0.0` otherwise. A missing or
/// non-numeric value at either end of the window also yields `0.0`.
pub fn calculate_trend<R: Record>(records: &[R], key: &str, periods: usize) -> f64 {
    if records.len() < 2 {
        return 0.0;
    }

    let window = &records[records.len().saturating_sub(periods)..];
    if window.len() < 2 {
        return 0.0;
    }

    match (window[0].numeric(key), window[window.len() - 1].numeric(key)) {
        (Some(first), Some(last)) => percent_change(first, last),
        _ => 0.0,
    }
}

/// `((last - first) / |first|) * 100`, with the zero-start policy described on
/// [`calculate_trend`].
pub fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        return if last > 0.0 { 100.0 } else { 0.0 };
    }
    ((last - first) / first.abs()) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn series(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| json!({ "v": v })).collect()
    }

    #[test]
    fn fewer_than_two_points_is_flat() {
        assert_eq!(trend(&series(&[]), "v"), 0.0);
        assert_eq!(trend(&series(&[10.0]), "v"), 0.0);
    }

    #[test]
    fn zero_start_saturates() {
        assert_eq!(trend(&series(&[0.0, 5.0]), "v"), 100.0);
        assert_eq!(trend(&series(&[0.0, 0.0]), "v"), 0.0);
        assert_eq!(trend(&series(&[0.0, -3.0]), "v"), 0.0);
    }

    #[test]
    fn sign_follows_direction() {
        assert_eq!(trend(&series(&[10.0, 20.0]), "v"), 100.0);
        assert_eq!(trend(&series(&[20.0, 10.0]), "v"), -50.0);
    }

    #[test]
    fn negative_start_uses_absolute_denominator() {
        assert_eq!(trend(&series(&[-10.0, -5.0]), "v"), 50.0);
        assert_eq!(trend(&series(&[-10.0, -20.0]), "v"), -100.0);
    }

    #[test]
    fn only_the_trailing_window_counts() {
        // Window of 5 over 7 points starts at 2.0, ends at 4.0.
        let data = series(&[8.0, 1.0, 2.0, 8.0, 9.0, 7.0, 4.0]);
        assert_eq!(trend(&data, "v"), 100.0);
        assert_eq!(calculate_trend(&data, "v", 2), ((4.0 - 7.0) / 7.0) * 100.0);
        // A window wider than the series covers all of it.
        assert_eq!(calculate_trend(&data, "v", 50), -50.0);
    }

    #[test]
    fn degenerate_windows_are_flat() {
        let data = series(&[1.0, 2.0, 3.0]);
        assert_eq!(calculate_trend(&data, "v", 1), 0.0);
        assert_eq!(calculate_trend(&data, "v", 0), 0.0);
    }

    #[test]
    fn missing_endpoint_value_is_flat() {
        let data = vec![json!({"v": 1}), json!({"v": 5}), json!({"other": 2})];
        assert_eq!(trend(&data, "v"), 0.0);
    }
}
