//! PostgreSQL adapters for the unfollow cascade ports.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module. Connections come from a shared `bb8` pool driven by
//! `diesel-async`.
//!
//! ```ignore
//! use user_causes::outbound::persistence::{DbPool, DieselCauseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/causes")).await?;
//! let causes = DieselCauseRepository::new(pool);
//! ```

mod diesel_cause_repository;
mod diesel_error_mapping;
mod diesel_user_cause_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_cause_repository::DieselCauseRepository;
pub use diesel_user_cause_repository::DieselUserCauseRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
