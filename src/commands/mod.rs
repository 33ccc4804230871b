// ABOUTME: Command module exports
// ABOUTME: Each command wraps a helper and returns an ApiResponse envelope

pub mod database;
pub mod filesystem;
pub mod random;
pub mod timing;

pub use database::*;
pub use filesystem::*;
pub use random::*;
pub use timing::*;
