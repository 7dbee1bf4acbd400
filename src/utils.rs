//! Utility functions for date handling and log formatting.
//!
//! This module provides helper functions used throughout the application:
//! - Target date computation ("yesterday" relative to a given instant)
//! - Date formatting for the NewsAPI query and the email subject
//! - String truncation for logging response bodies
//! - JSON error classification for malformed responses

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};

/// The calendar day before `now`, in `now`'s timezone.
///
/// # Examples
///
/// ```ignore
/// let now = Local.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap();
/// assert_eq!(target_date(now), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
/// ```
pub fn target_date<Tz: TimeZone>(now: DateTime<Tz>) -> NaiveDate {
    let today = now.date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Target date for a run starting at the current local time.
pub fn target_date_now() -> NaiveDate {
    target_date(Local::now())
}

/// `YYYY-MM-DD`, as NewsAPI expects for `from`/`to`.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Full month name, zero-padded day, four-digit year: `May 05, 2025`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// Used to tell a cut-off response body apart from one that was never JSON
/// (an HTML error page from a proxy, for example).
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_target_date_is_previous_day() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 6, 0, 0).unwrap();
        assert_eq!(target_date(now), NaiveDate::from_ymd_opt(2025, 5, 5).unwrap());
    }

    #[test]
    fn test_target_date_crosses_month_and_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 1).unwrap();
        assert_eq!(target_date(now), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(target_date(now), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_target_date_uses_local_calendar_day() {
        // 23:30 UTC on May 6th is already May 7th at UTC+2
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc
            .with_ymd_and_hms(2025, 5, 6, 23, 30, 0)
            .unwrap()
            .with_timezone(&tz);
        assert_eq!(target_date(now), NaiveDate::from_ymd_opt(2025, 5, 6).unwrap());
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(iso_date(date), "2025-05-05");
        assert_eq!(long_date(date), "May 05, 2025");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        let s = "é".repeat(10);
        let result = truncate_for_log(&s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("…(+18 bytes)"));
    }

    #[test]
    fn test_looks_truncated() {
        let json_eof = r#"{"field": "value"#;
        let err = serde_json::from_str::<serde_json::Value>(json_eof).unwrap_err();
        assert!(looks_truncated(&err));

        let not_json = "<html>Bad Gateway</html>";
        let err = serde_json::from_str::<serde_json::Value>(not_json).unwrap_err();
        assert!(!looks_truncated(&err));
    }
}
