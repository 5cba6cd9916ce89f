//! Wire-format validation utilities
//!
//! Dates arrive as plain `YYYY-MM-DD` strings (no timezone) and times of day
//! as `HH:MM` 24-hour strings. Malformed values are input errors surfaced
//! synchronously to the caller.

use chrono::{NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{BookingError, BookingResult};

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_wire_date(value: &str) -> BookingResult<NaiveDate> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DATE_REGEX
        .get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to compile date regex"));

    if !regex.is_match(value) {
        return Err(BookingError::InvalidInput(format!(
            "Date must be in YYYY-MM-DD format, got '{value}'"
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        BookingError::InvalidInput(format!("'{value}' is not a valid calendar date"))
    })
}

/// Parse an `HH:MM` 24-hour time of day
pub fn parse_wire_time(value: &str) -> BookingResult<NaiveTime> {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Failed to compile time regex")
    });

    if !regex.is_match(value) {
        return Err(BookingError::InvalidInput(format!(
            "Time must be in HH:MM 24-hour format, got '{value}'"
        )));
    }

    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| BookingError::InvalidInput(format!("'{value}' is not a valid time of day")))
}

/// Parse a weekday name ("Monday", "monday" or "Mon")
pub fn parse_weekday(value: &str) -> BookingResult<Weekday> {
    value
        .parse::<Weekday>()
        .map_err(|_| BookingError::InvalidInput(format!("'{value}' is not a weekday")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_date() {
        assert_eq!(
            parse_wire_date("2025-06-02").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
        // leap day
        assert!(parse_wire_date("2024-02-29").is_ok());
        assert!(parse_wire_date("2025-02-29").is_err());
        assert!(parse_wire_date("2025-13-01").is_err());
        assert!(parse_wire_date("06/02/2025").is_err());
        assert!(parse_wire_date("2025-6-2").is_err());
        assert!(parse_wire_date("").is_err());
    }

    #[test]
    fn test_parse_wire_time() {
        assert_eq!(
            parse_wire_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_wire_time("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        assert!(parse_wire_time("24:00").is_err());
        assert!(parse_wire_time("9:30").is_err());
        assert!(parse_wire_time("09:60").is_err());
        assert!(parse_wire_time("09-30").is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Sun").unwrap(), Weekday::Sun);
        assert!(parse_weekday("Someday").is_err());
    }
}
