//! HTTP inbound adapter exposing the student registry endpoints.

pub mod error;
pub mod flash;
pub mod photo_payload;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, PlainTextError};
