//! `yyyy-MM-dd` date handling shared by the readable and persistable models.

use chrono::{DateTime, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    format_date(timestamp.date_naive())
}

/// Parses a `yyyy-MM-dd` date.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `raw` is not a valid calendar date in
/// that format.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_date_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn format_timestamp_uses_utc_calendar_day() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-12-31");
    }

    #[test]
    fn parse_date_trims_whitespace() {
        let date = parse_date(" 2025-01-15 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("15/01/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }
}
