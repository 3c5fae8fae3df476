//! PostgreSQL-backed `UserCauseRepository`.
//!
//! Each batch handed to [`UserCauseRepository::delete_batch`] runs as one
//! `DELETE` statement matching the exact key pairs, passed as two parallel
//! arrays, mirroring a batch-write request against a key-value store.
//! Deleting keys that no longer exist affects zero rows and succeeds.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::{QueryFragment, QueryId};
use diesel::sql_types::{Array, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserCauseRepository, UserCauseRepositoryError};
use crate::domain::{CauseId, UserCauseKey, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserCauseRow;
use super::pool::{DbPool, PoolError};
use super::schema::user_causes;

const DELETE_BATCH_SQL: &str = "DELETE FROM user_causes WHERE (user_id, cause_id) IN \
     (SELECT * FROM UNNEST($1::varchar[], $2::varchar[]))";

/// Diesel implementation of the relationship store port.
#[derive(Clone)]
pub struct DieselUserCauseRepository {
    pool: DbPool,
}

impl DieselUserCauseRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserCauseRepositoryError {
    map_pool_error(error, |message| UserCauseRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> UserCauseRepositoryError {
    map_diesel_error(
        error,
        |message| UserCauseRepositoryError::query(message),
        |message| UserCauseRepositoryError::connection(message),
    )
}

fn row_to_key(row: UserCauseRow) -> Result<UserCauseKey, UserCauseRepositoryError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|err| UserCauseRepositoryError::query(format!("stored user_id invalid: {err}")))?;
    let cause_id = CauseId::new(row.cause_id).map_err(|err| {
        UserCauseRepositoryError::query(format!("stored cause_id invalid: {err}"))
    })?;
    Ok(UserCauseKey::new(user_id, cause_id))
}

fn key_columns(keys: &[UserCauseKey]) -> (Vec<String>, Vec<String>) {
    keys.iter()
        .map(|key| {
            (
                key.user_id.as_ref().to_owned(),
                key.cause_id.as_ref().to_owned(),
            )
        })
        .unzip()
}

fn delete_batch_query(
    user_ids: Vec<String>,
    cause_ids: Vec<String>,
) -> impl QueryFragment<Pg> + QueryId + Send {
    diesel::sql_query(DELETE_BATCH_SQL)
        .bind::<Array<Text>, _>(user_ids)
        .bind::<Array<Text>, _>(cause_ids)
}

#[async_trait]
impl UserCauseRepository for DieselUserCauseRepository {
    async fn find_keys(
        &self,
        user_id: &UserId,
        cause_id: &CauseId,
    ) -> Result<Vec<UserCauseKey>, UserCauseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<UserCauseRow> = user_causes::table
            .filter(user_causes::user_id.eq(user_id.as_ref()))
            .filter(user_causes::cause_id.eq(cause_id.as_ref()))
            .select(UserCauseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_key).collect()
    }

    async fn delete_batch(&self, keys: Vec<UserCauseKey>) -> Result<(), UserCauseRepositoryError> {
        if keys.is_empty() {
            return Ok(());
        }
        let (user_ids, cause_ids) = key_columns(&keys);

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = delete_batch_query(user_ids, cause_ids)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        debug!(requested = keys.len(), deleted, "user_causes batch deleted");
        Ok(())
    }

    async fn count_for_cause(&self, cause_id: &CauseId) -> Result<u64, UserCauseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let count: i64 = user_causes::table
            .filter(user_causes::cause_id.eq(cause_id.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        u64::try_from(count)
            .map_err(|_| UserCauseRepositoryError::query(format!("negative count {count}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use rstest::rstest;

    fn key(user: &str, cause: &str) -> UserCauseKey {
        UserCauseKey::new(
            UserId::new(user).expect("user id"),
            CauseId::new(cause).expect("cause id"),
        )
    }

    #[rstest]
    fn key_columns_keep_pairs_aligned() {
        let keys = [key("u1", "c1"), key("u2", "c2")];

        let (user_ids, cause_ids) = key_columns(&keys);

        assert_eq!(user_ids, ["u1", "u2"]);
        assert_eq!(cause_ids, ["c1", "c2"]);
    }

    #[rstest]
    fn batch_delete_is_one_statement_over_both_arrays() {
        let (user_ids, cause_ids) = key_columns(&[key("u1", "c1"), key("u2", "c1")]);

        let statement = delete_batch_query(user_ids, cause_ids);
        let sql = debug_query::<Pg, _>(&statement).to_string();

        assert!(sql.starts_with("DELETE FROM user_causes WHERE (user_id, cause_id) IN"));
        assert!(sql.contains("UNNEST($1::varchar[], $2::varchar[])"));
        assert!(sql.contains("\"u1\"") && sql.contains("\"u2\""));
    }

    #[rstest]
    fn stored_rows_become_domain_keys() {
        let key = row_to_key(UserCauseRow {
            user_id: "user123".into(),
            cause_id: "cause456".into(),
        })
        .expect("valid row");
        assert_eq!(key.to_string(), "user123/cause456");
    }

    #[rstest]
    fn blank_stored_cause_is_a_query_error() {
        let error = row_to_key(UserCauseRow {
            user_id: "user123".into(),
            cause_id: String::new(),
        })
        .expect_err("invalid row");
        assert!(matches!(error, UserCauseRepositoryError::Query { .. }));
    }
}
