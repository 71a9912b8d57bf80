use crate::error::CoreError;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write;

/// Checks that `pattern` is a `strftime` pattern able to render a calendar date.
///
/// Chart dates carry no time of day, so time specifiers such as `%H` are
/// rejected along with malformed patterns.
pub fn check_date_format(pattern: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::InvalidInput("date format".to_string(), pattern.to_string());

    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::default().format(pattern)).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_patterns_are_accepted() {
        assert!(check_date_format("%d/%m/%Y").is_ok());
        assert!(check_date_format("%Y-%m-%d").is_ok());
        assert!(check_date_format("%e %b").is_ok());
    }

    #[test]
    fn time_specifiers_are_rejected() {
        let err = check_date_format("%d/%m %H:%M").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input for date format: %d/%m %H:%M");
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(check_date_format("%d/%").is_err());
        assert!(check_date_format("%Q").is_err());
    }
}
