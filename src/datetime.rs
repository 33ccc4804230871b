// ABOUTME: Date/time formatting and wait helpers for test flows
// ABOUTME: strftime-style formatting of local time, async and blocking waits

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

use crate::duration::{self, DurationError};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateTimeError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Format a date/time with a strftime pattern, rejecting malformed patterns
pub fn format_datetime<Tz>(dt: &DateTime<Tz>, format: &str) -> Result<String, DateTimeError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(DateTimeError::InvalidFormat(format.to_string()));
    }
    Ok(dt.format_with_items(items.into_iter()).to_string())
}

/// Today's local date, e.g. `%Y-%m-%d`, `%m/%d/%Y`, `%d-%b-%Y`
pub fn today_date(format: &str) -> Result<String, DateTimeError> {
    format_datetime(&Local::now(), format)
}

/// Current local timestamp, e.g. `%Y-%m-%d %H:%M:%S`, `%Y%m%d_%H%M%S`
pub fn current_timestamp(format: &str) -> Result<String, DateTimeError> {
    format_datetime(&Local::now(), format)
}

pub async fn wait_for(duration: Duration) {
    log::debug!("waiting {:?}", duration);
    tokio::time::sleep(duration).await;
}

pub async fn wait_for_millis(milliseconds: u64) {
    wait_for(Duration::from_millis(milliseconds)).await;
}

/// Wait for a compact duration such as `"2d5h10m"`, `"1h30m"` or `"45s"`.
/// Nothing is awaited when the string does not parse.
pub async fn wait_for_duration(duration: &str) -> Result<Duration, DateTimeError> {
    let parsed = duration::parse_duration(duration)?;
    wait_for(parsed).await;
    Ok(parsed)
}

/// Blocking wait for callers without a runtime
pub fn wait_for_blocking(duration: Duration) {
    log::debug!("waiting (blocking) {:?}", duration);
    std::thread::sleep(duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::time::Instant;

    fn fixed() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_format_datetime() {
        let dt = fixed();
        assert_eq!(format_datetime(&dt, DEFAULT_DATE_FORMAT).unwrap(), "2024-03-07");
        assert_eq!(
            format_datetime(&dt, DEFAULT_TIMESTAMP_FORMAT).unwrap(),
            "2024-03-07 09:05:03"
        );
        assert_eq!(format_datetime(&dt, "%m/%d/%Y").unwrap(), "03/07/2024");
        assert_eq!(format_datetime(&dt, "%d-%b-%Y").unwrap(), "07-Mar-2024");
        assert_eq!(format_datetime(&dt, "%Y%m%d_%H%M%S").unwrap(), "20240307_090503");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(
            format_datetime(&fixed(), "%Y-%Q"),
            Err(DateTimeError::InvalidFormat("%Y-%Q".to_string()))
        );
    }

    #[test]
    fn test_today_date_shape() {
        let today = today_date(DEFAULT_DATE_FORMAT).unwrap();
        assert!(NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
        assert!(current_timestamp("%H:%M:%S").unwrap().len() == 8);
    }

    #[tokio::test]
    async fn test_wait_for_duration() {
        let start = Instant::now();
        let waited = wait_for_duration("0s").await.unwrap();
        assert_eq!(waited, Duration::ZERO);

        wait_for_millis(20).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_wait_for_duration_rejects_bad_unit() {
        assert_eq!(
            wait_for_duration("3y").await,
            Err(DateTimeError::Duration(DurationError::InvalidUnit('y')))
        );
    }

    #[test]
    fn test_wait_for_blocking() {
        let start = Instant::now();
        wait_for_blocking(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
