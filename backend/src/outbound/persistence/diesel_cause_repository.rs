//! PostgreSQL-backed `CauseRepository`.
//!
//! The counter update is a single guarded statement:
//! `UPDATE causes SET follower_count = COALESCE(follower_count, 0) + $delta
//! WHERE cause_id = $id`. Zero affected rows means the cause does not exist
//! and is reported as a failed condition.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::CauseId;
use crate::domain::ports::{CauseRepository, CauseRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::CauseCounterRow;
use super::pool::{DbPool, PoolError};
use super::schema::causes;

/// Diesel implementation of the cause store port.
#[derive(Clone)]
pub struct DieselCauseRepository {
    pool: DbPool,
}

impl DieselCauseRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CauseRepositoryError {
    map_pool_error(error, |message| CauseRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> CauseRepositoryError {
    map_diesel_error(
        error,
        |message| CauseRepositoryError::query(message),
        |message| CauseRepositoryError::connection(message),
    )
}

fn require_row(affected: usize, cause_id: &CauseId) -> Result<(), CauseRepositoryError> {
    if affected == 0 {
        return Err(CauseRepositoryError::condition_failed(cause_id.as_ref()));
    }
    Ok(())
}

#[async_trait]
impl CauseRepository for DieselCauseRepository {
    async fn adjust_follower_count(
        &self,
        cause_id: &CauseId,
        delta: i64,
    ) -> Result<(), CauseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::update(causes::table.filter(causes::cause_id.eq(cause_id.as_ref())))
            .set(
                causes::follower_count.eq(sql::<Nullable<BigInt>>("COALESCE(follower_count, 0) + ")
                    .bind::<BigInt, _>(delta)),
            )
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        debug!(%cause_id, delta, affected, "follower count adjusted");
        require_row(affected, cause_id)
    }

    async fn follower_count(&self, cause_id: &CauseId) -> Result<Option<i64>, CauseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<CauseCounterRow> = causes::table
            .filter(causes::cause_id.eq(cause_id.as_ref()))
            .select(CauseCounterRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(|row| row.follower_count.unwrap_or(0)))
    }

    async fn set_follower_count(
        &self,
        cause_id: &CauseId,
        value: i64,
    ) -> Result<(), CauseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::update(causes::table.filter(causes::cause_id.eq(cause_id.as_ref())))
            .set(causes::follower_count.eq(Some(value)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        require_row(affected, cause_id)
    }
}
