//! Port for the `causes` entity store.
//!
//! Cause rows carry a denormalised `follower_count`. An absent count reads as
//! zero. Every mutation here is conditional on the cause row existing; when
//! it does not, adapters must report
//! [`CauseRepositoryError::ConditionFailed`] rather than creating the row.

use async_trait::async_trait;

use crate::domain::CauseId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by cause store adapters.
    pub enum CauseRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "causes store connection failed: {message}",
        /// Query or write failed during execution.
        Query { message: String } =>
            "causes store operation failed: {message}",
        /// The cause row did not exist, so the conditional write was rejected.
        ConditionFailed { cause_id: String } =>
            "conditional check failed: cause {cause_id} does not exist",
    }
}

/// Counter operations on cause entities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CauseRepository: Send + Sync {
    /// Add `delta` to the follower count, treating a missing count as zero.
    ///
    /// No floor is applied: decrementing a zero count stores `-1`.
    async fn adjust_follower_count(
        &self,
        cause_id: &CauseId,
        delta: i64,
    ) -> Result<(), CauseRepositoryError>;

    /// Read the stored follower count.
    ///
    /// Returns `None` when the cause row does not exist and `Some(0)` when the
    /// row exists without a count.
    async fn follower_count(&self, cause_id: &CauseId) -> Result<Option<i64>, CauseRepositoryError>;

    /// Overwrite the follower count of an existing cause.
    async fn set_follower_count(
        &self,
        cause_id: &CauseId,
        value: i64,
    ) -> Result<(), CauseRepositoryError>;
}
