//! HTTP adapter: handlers, extractors, and error mapping.

pub mod auth;
pub mod bearer;
pub mod error;
pub mod state;
pub mod users;
pub mod votes;

pub mod guard;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiError, ApiResult};
