//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use user_causes::domain::DecrementPolicy;
use user_causes::inbound::http::auth::TokenVerifier;
use user_causes::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<TokenVerifier>,
    pub(crate) policy: DecrementPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with the in-memory store and the
    /// default decrement policy.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<TokenVerifier>) -> Self {
        Self {
            bind_addr,
            tokens,
            policy: DecrementPolicy::default(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the unfollow cascade runs against PostgreSQL instead
    /// of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select when the follower counter is decremented.
    #[must_use]
    pub fn with_policy(mut self, policy: DecrementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
