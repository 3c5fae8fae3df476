//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! port, so they are testable with mocks and without I/O.

use std::sync::Arc;

use crate::domain::ports::UnfollowCauseCommand;

use super::auth::TokenVerifier;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub unfollow: Arc<dyn UnfollowCauseCommand>,
    pub tokens: Arc<TokenVerifier>,
}

impl HttpState {
    pub fn new(unfollow: Arc<dyn UnfollowCauseCommand>, tokens: Arc<TokenVerifier>) -> Self {
        Self { unfollow, tokens }
    }
}
