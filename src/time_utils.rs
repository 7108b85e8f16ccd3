// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for schedule dates and workout times.

use chrono::{NaiveDate, NaiveTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// chrono accepts unpadded and space-padded fields; only the canonical
/// spelling is allowed.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == raw)
}

/// Parse an `HH:MM` time of day (zero-padded).
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .ok()
        .filter(|time| time.format(TIME_FORMAT).to_string() == raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-06"),
            NaiveDate::from_ymd_opt(2025, 1, 6)
        );
        assert_eq!(parse_date("2025-1-6"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("06/01/2025"), None);
    }

    #[test]
    fn test_parse_date_rejects_space_padding() {
        assert_eq!(parse_date("2025-01- 6"), None);
        assert_eq!(parse_date("2025- 1-06"), None);
        assert_eq!(parse_date(" 2025-1-06"), None);
        assert_eq!(parse_date("2025-01-06 "), None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse_time("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("8:00"), None);
        assert_eq!(parse_time(" 8:00"), None);
        assert_eq!(parse_time("08: 5"), None);
    }

    #[test]
    fn test_format_date_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 6).unwrap();
        assert_eq!(format_date(date), "2025-12-06");
    }
}
