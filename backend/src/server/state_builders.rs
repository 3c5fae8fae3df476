//! Builders for HTTP state ports and the token verifier.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroize;

use user_causes::domain::UnfollowCauseService;
use user_causes::domain::ports::UnfollowCauseCommand;
use user_causes::inbound::http::auth::TokenVerifier;
use user_causes::inbound::http::state::HttpState;
use user_causes::outbound::memory::InMemoryCauseStore;
use user_causes::outbound::persistence::{DieselCauseRepository, DieselUserCauseRepository};
use user_causes::settings::ServiceSettings;

use super::ServerConfig;

/// Build the unfollow command for the configured store.
///
/// Uses the Diesel repositories when a pool is available, otherwise a
/// process-local [`InMemoryCauseStore`] serves both ports.
pub(super) fn build_unfollow_command(config: &ServerConfig) -> Arc<dyn UnfollowCauseCommand> {
    match &config.db_pool {
        Some(pool) => Arc::new(
            UnfollowCauseService::new(
                Arc::new(DieselUserCauseRepository::new(pool.clone())),
                Arc::new(DieselCauseRepository::new(pool.clone())),
            )
            .with_policy(config.policy),
        ),
        None => {
            info!("no database configured; using in-memory cause store");
            let store = Arc::new(InMemoryCauseStore::new());
            Arc::new(
                UnfollowCauseService::new(Arc::clone(&store), store).with_policy(config.policy),
            )
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        build_unfollow_command(config),
        Arc::clone(&config.tokens),
    ))
}

/// Build the bearer token verifier from settings.
///
/// The configured secret is wiped from the settings once the decoding key
/// has been derived. Debug builds fall back to a random per-process secret.
///
/// # Errors
/// Returns [`std::io::Error`] in release builds when no secret is configured.
pub(crate) fn build_token_verifier(
    settings: &mut ServiceSettings,
) -> std::io::Result<TokenVerifier> {
    let issuer = settings.jwt_issuer.as_deref();
    let audience = settings.jwt_audience.as_deref();
    match settings.jwt_secret.as_mut() {
        Some(secret) => {
            let verifier = TokenVerifier::hs256(secret.as_bytes(), issuer, audience);
            secret.zeroize();
            Ok(verifier)
        }
        None if cfg!(debug_assertions) => {
            warn!("using temporary token secret (dev only)");
            let mut secret = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
            let verifier = TokenVerifier::hs256(secret.as_bytes(), issuer, audience);
            secret.zeroize();
            Ok(verifier)
        }
        None => Err(std::io::Error::other(
            "USER_CAUSES_JWT_SECRET must be set in release builds",
        )),
    }
}
