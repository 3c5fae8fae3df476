//! Wire bodies returned by the HTTP adapter.
//!
//! Field names and literal messages are part of the public contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned after a successful unfollow.
pub const UNFOLLOW_SUCCESS_MESSAGE: &str = "cause unfollowed successfully.";
/// Fixed message of every 400 response.
pub const BAD_REQUEST_MESSAGE: &str = "sorry, there was an error processing your request";
/// Message of every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
/// Prefix of every 500 `error` field.
pub const INTERNAL_ERROR_PREFIX: &str = "Unexpected server error: ";

/// 200 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "cause unfollowed successfully.")]
    pub message: String,
}

impl MessageBody {
    /// Body for a completed unfollow.
    pub fn unfollowed() -> Self {
        Self {
            message: UNFOLLOW_SUCCESS_MESSAGE.to_owned(),
        }
    }

    /// Body for a missing or rejected identity.
    pub fn unauthorized() -> Self {
        Self {
            message: UNAUTHORIZED_MESSAGE.to_owned(),
        }
    }
}

/// 400 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BadRequestBody {
    #[schema(example = 400)]
    pub status: u16,
    #[schema(example = "sorry, there was an error processing your request")]
    pub message: String,
    #[schema(example = "cause_id not present")]
    pub detail: String,
}

impl BadRequestBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: BAD_REQUEST_MESSAGE.to_owned(),
            detail: detail.into(),
        }
    }
}

/// 500 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InternalErrorBody {
    #[schema(example = "Unexpected server error: conditional check failed")]
    pub error: String,
}

impl InternalErrorBody {
    pub fn new(detail: &str) -> Self {
        Self {
            error: format!("{INTERNAL_ERROR_PREFIX}{detail}"),
        }
    }
}
