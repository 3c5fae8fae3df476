//! Service entry-point: loads settings, wires the store, and serves HTTP.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_causes::inbound::http::health::HealthState;
use user_causes::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use user_causes::settings::ServiceSettings;

use server::{ServerConfig, build_token_verifier, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut settings = ServiceSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|e| {
        std::io::Error::other(format!("invalid bind address {}: {e}", settings.bind_addr()))
    })?;
    let policy = settings
        .decrement_policy()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let tokens = Arc::new(build_token_verifier(&mut settings)?);

    let mut config = ServerConfig::new(bind_addr, tokens).with_policy(policy);
    if let Some(database_url) = settings.database_url.as_deref() {
        if settings.migrate_on_startup {
            let applied = run_pending_migrations(database_url)
                .await
                .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
            info!(applied, "schema migrations applied");
        }
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    info!(%bind_addr, %policy, "starting user causes service");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
