//! Timestamp helpers shared by the schedulers and history operations.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, RecallError, RecallResult};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Elapsed days between two reviews, counted as UTC calendar days.
///
/// A review at 23:59 followed by one at 00:01 the next day is one day apart.
pub fn date_diff_in_days(last: DateTime<Utc>, cur: DateTime<Utc>) -> i64 {
    (cur.date_naive() - last.date_naive()).num_days()
}

/// Whole days from `earlier` to `later`, rounded down.
pub fn days_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// `now` shifted by whole minutes, saturating at the representable range.
pub fn add_minutes(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    saturating_add(now, Duration::try_minutes(minutes), minutes < 0)
}

/// `now` shifted by whole days, saturating at the representable range.
pub fn add_days(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    saturating_add(now, Duration::try_days(days), days < 0)
}

fn saturating_add(now: DateTime<Utc>, delta: Option<Duration>, negative: bool) -> DateTime<Utc> {
    match delta.and_then(|delta| now.checked_add_signed(delta)) {
        Some(shifted) => shifted,
        None if negative => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Parse a timestamp from RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC),
/// or epoch milliseconds.
pub fn parse_timestamp(value: &str) -> RecallResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<i64>() {
        return from_millis(millis);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid_date(value))
}

fn from_millis(millis: i64) -> RecallResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| invalid_date(millis))
}

fn invalid_date(value: impl std::fmt::Display) -> RecallError {
    RecallError::parse(ErrorCode::ParseTimestamp, format!("Invalid date:[{}]", value))
}

/// Timestamp as it may arrive from a host: text or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
    Millis(i64),
    Text(String),
}

impl TimestampInput {
    /// Resolve to a UTC timestamp.
    pub fn resolve(&self) -> RecallResult<DateTime<Utc>> {
        match self {
            TimestampInput::Millis(millis) => from_millis(*millis),
            TimestampInput::Text(text) => parse_timestamp(text),
        }
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimestampInput::Text(value.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_date_diff_counts_calendar_days() {
        let last = at(2024, 8, 10, 23, 59);
        assert_eq!(date_diff_in_days(last, at(2024, 8, 11, 0, 1)), 1);
        assert_eq!(date_diff_in_days(last, at(2024, 8, 10, 23, 59)), 0);
        assert_eq!(date_diff_in_days(last, at(2024, 8, 20, 12, 0)), 10);
    }

    #[test]
    fn test_days_between_floors_partial_days() {
        let earlier = at(2024, 8, 10, 12, 0);
        assert_eq!(days_between(at(2024, 8, 11, 11, 59), earlier), 0);
        assert_eq!(days_between(at(2024, 8, 11, 12, 0), earlier), 1);
        assert_eq!(days_between(at(2024, 8, 10, 11, 0), earlier), -1);
    }

    #[test]
    fn test_shifts_saturate_instead_of_overflowing() {
        let now = at(2024, 8, 10, 12, 0);
        assert_eq!(add_days(now, 3), at(2024, 8, 13, 12, 0));
        assert_eq!(add_minutes(now, -30), at(2024, 8, 10, 11, 30));

        assert_eq!(add_days(now, 1_000_000_000), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_days(now, i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_minutes(now, i64::MIN), DateTime::<Utc>::MIN_UTC);
        assert_eq!(add_days(DateTime::<Utc>::MAX_UTC, 1), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = at(2022, 12, 29, 12, 30);
        assert_eq!(parse_timestamp("2022-12-29T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2022-12-29T13:30:00+01:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2022-12-29 12:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("1672317000000").unwrap(), expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseTimestamp);
    }

    #[test]
    fn test_timestamp_input_untagged() {
        let millis: TimestampInput = serde_json::from_str("1672317000000").unwrap();
        let text: TimestampInput = serde_json::from_str("\"2022-12-29T12:30:00Z\"").unwrap();
        assert_eq!(millis.resolve().unwrap(), text.resolve().unwrap());
    }
}
