//! Text and timestamp helpers shared by fixtures and payloads

use chrono::{DateTime, NaiveDate, Utc};

/// Calendar date format used for birth dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time format with a fixed UTC offset, as the immunisation API expects
pub const UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Collapse every run of whitespace to one space and trim both ends.
///
/// Rendered pages collapse whitespace the same way, so names read from
/// fixtures must go through this before they are compared with page text.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Current wall-clock time in UTC
pub fn current_datetime() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_utc_datetime(at: DateTime<Utc>) -> String {
    at.format(UTC_DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    #[test_case("  Smith ", "Smith" ; "padded")]
    #[test_case("Jo  Ann", "Jo Ann" ; "double space")]
    #[test_case("\tMary\n Jane ", "Mary Jane" ; "tabs and newlines")]
    #[test_case("   ", "" ; "blank")]
    fn test_normalize_whitespace(input: &str, expected: &str) {
        assert_eq!(normalize_whitespace(input), expected);
    }

    #[test]
    fn test_format_utc_datetime() {
        let at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 5, 3).unwrap();
        assert_eq!(format_utc_datetime(at), "2025-01-15T09:05:03+00:00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2014, 2, 28).unwrap();
        assert_eq!(format_date(date), "2014-02-28");
        assert_eq!(format_date(date.succ_opt().unwrap()), "2014-03-01");
    }
}
