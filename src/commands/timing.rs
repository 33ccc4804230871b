// ABOUTME: Date, time and duration commands
// ABOUTME: Formatting the current time, parsing duration strings and waiting

use serde::Serialize;

use crate::datetime;
use crate::duration;
use crate::ApiResponse;

#[derive(Debug, Serialize)]
pub struct ParsedDuration {
    pub input: String,
    pub milliseconds: u64,
}

/// Parse a compact duration string into milliseconds
pub fn parse_duration(input: &str) -> ApiResponse<ParsedDuration> {
    match duration::parse_millis(input) {
        Ok(milliseconds) => ApiResponse::success(ParsedDuration {
            input: input.to_string(),
            milliseconds,
        }),
        Err(e) => ApiResponse::error(format!("Failed to parse duration: {}", e)),
    }
}

/// Wait for a compact duration, then report how long was waited
pub async fn wait(input: &str) -> ApiResponse<ParsedDuration> {
    match datetime::wait_for_duration(input).await {
        Ok(waited) => ApiResponse::success(ParsedDuration {
            input: input.to_string(),
            milliseconds: waited.as_millis() as u64,
        }),
        Err(e) => ApiResponse::error(format!("Failed to wait: {}", e)),
    }
}

pub fn today(format: &str) -> ApiResponse<String> {
    ApiResponse::from_result(datetime::today_date(format), "Failed to format date")
}

pub fn timestamp(format: &str) -> ApiResponse<String> {
    ApiResponse::from_result(datetime::current_timestamp(format), "Failed to format timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_command() {
        let response = parse_duration("1h30m");
        assert!(response.success);
        assert_eq!(response.data.unwrap().milliseconds, 5_400_000);

        let response = parse_duration("10x");
        assert!(!response.success);
        assert!(response.messages.error[0].contains("Invalid duration unit: x"));
    }

    #[tokio::test]
    async fn test_wait_command() {
        let response = wait("0s").await;
        assert!(response.success);
        assert_eq!(response.data.unwrap().milliseconds, 0);
    }

    #[test]
    fn test_today_bad_format() {
        assert!(!today("%Q").success);
    }
}
