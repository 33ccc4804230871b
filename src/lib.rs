// ABOUTME: Test automation helper library
// ABOUTME: Module declarations and the JSON response envelope used by the CLI commands

use serde::{Deserialize, Serialize};

// Module declarations
pub mod commands;
pub mod config;
pub mod datetime;
pub mod db;
pub mod directories;
pub mod duration;
pub mod files;
pub mod models;
pub mod strings;

pub use duration::{parse_duration, parse_millis, DurationError};

/// Standard response format printed by every command
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub messages: Messages,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Messages {
    pub error: Vec<String>,
    pub warning: Vec<String>,
    pub info: Vec<String>,
    pub success: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            messages: Messages::default(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            messages: Messages {
                error: vec![message],
                ..Default::default()
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wrap a helper result, prefixing errors with what was being attempted
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>, context: &str) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(format!("{}: {}", context, e)),
        }
    }

    pub fn with_info(mut self, message: impl Into<String>) -> Self {
        self.messages.info.push(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(42).with_info("answer");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert_eq!(json["messages"]["info"][0], "answer");
    }

    #[test]
    fn test_from_result_error() {
        let response: ApiResponse<u64> =
            ApiResponse::from_result(parse_millis("5q"), "Failed to parse duration");
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(
            response.messages.error,
            vec!["Failed to parse duration: Invalid duration unit: q"]
        );
    }
}
