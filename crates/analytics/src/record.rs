use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A record whose fields can be read as numbers by name.
///
/// Time-series data reaches the analytics layer in several shapes (raw JSON objects
/// from the API, or maps built locally), so the calculators are generic over this
/// trait instead of a concrete point type.
pub trait Record {
    /// Returns the field as a finite number, or `None` if it is absent or not numeric.
    fn numeric(&self, key: &str) -> Option<f64>;
}

impl Record for Value {
    fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_as_number)
    }
}

impl Record for Map<String, Value> {
    fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_as_number)
    }
}

impl Record for HashMap<String, f64> {
    fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).copied().filter(|v| v.is_finite())
    }
}

impl Record for BTreeMap<String, f64> {
    fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).copied().filter(|v| v.is_finite())
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn numeric(&self, key: &str) -> Option<f64> {
        (**self).numeric(key)
    }
}

/// Interprets a JSON value as a number.
///
/// Numeric strings count (the backend sends some percentages as strings); booleans,
/// nulls, and anything that does not parse to a finite number do not.
pub fn value_as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_fields_are_read_leniently() {
        let record = json!({"goals": 2, "accuracy": "81.5", "bad": "n/a", "flag": true, "none": null});
        assert_eq!(record.numeric("goals"), Some(2.0));
        assert_eq!(record.numeric("accuracy"), Some(81.5));
        assert_eq!(record.numeric("bad"), None);
        assert_eq!(record.numeric("flag"), None);
        assert_eq!(record.numeric("none"), None);
        assert_eq!(record.numeric("missing"), None);
    }

    #[test]
    fn non_object_values_have_no_fields() {
        assert_eq!(json!(5).numeric("goals"), None);
        assert_eq!(json!([1, 2]).numeric("0"), None);
    }

    #[test]
    fn maps_reject_non_finite_values() {
        let mut record = HashMap::new();
        record.insert("xg".to_string(), f64::NAN);
        record.insert("shots".to_string(), 4.0);
        assert_eq!(record.numeric("xg"), None);
        assert_eq!(record.numeric("shots"), Some(4.0));
    }
}
