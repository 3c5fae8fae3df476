//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod response;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod user_causes;

pub use error::ApiResult;
