//! Port for the `user_causes` relationship store.
//!
//! Each record states that a user follows a cause and is keyed by
//! `(user_id, cause_id)`. The unfollow cascade only reads keys and deletes
//! them; records are created by the follow flow elsewhere.

use async_trait::async_trait;

use crate::domain::{CauseId, UserCauseKey, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by relationship store adapters.
    pub enum UserCauseRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "user_causes store connection failed: {message}",
        /// Query or write failed during execution.
        Query { message: String } =>
            "user_causes store operation failed: {message}",
    }
}

/// Relationship store operations used by the unfollow cascade.
///
/// `delete_batch` receives at most
/// [`MAX_BATCH_WRITE_ITEMS`](crate::domain::batching::MAX_BATCH_WRITE_ITEMS)
/// keys per call. Deleting a key that is already gone must succeed so that
/// redelivered requests stay harmless at this step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCauseRepository: Send + Sync {
    /// Return the stored keys matching `(user_id, cause_id)`.
    ///
    /// Normally zero or one key, but callers tolerate any number.
    async fn find_keys(
        &self,
        user_id: &UserId,
        cause_id: &CauseId,
    ) -> Result<Vec<UserCauseKey>, UserCauseRepositoryError>;

    /// Delete the given keys as a single batch write.
    async fn delete_batch(&self, keys: Vec<UserCauseKey>) -> Result<(), UserCauseRepositoryError>;

    /// Count live associations for a cause.
    async fn count_for_cause(&self, cause_id: &CauseId) -> Result<u64, UserCauseRepositoryError>;
}
