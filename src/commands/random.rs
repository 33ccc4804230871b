// ABOUTME: Random data commands
// ABOUTME: Strings, digit strings and UUIDs for unique test fixtures

use crate::strings;
use crate::ApiResponse;

pub fn random_string(length: usize) -> ApiResponse<String> {
    ApiResponse::success(strings::generate_random_string(length))
}

pub fn random_integer(length: usize) -> ApiResponse<String> {
    ApiResponse::success(strings::generate_random_integer(length))
}

pub fn uuid() -> ApiResponse<String> {
    ApiResponse::success(strings::generate_uuid())
}
