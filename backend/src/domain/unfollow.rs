//! Unfollow cascade domain service.
//!
//! The cascade spans two independent stores and is not atomic:
//!
//! 1. the association remover deletes every `user_causes` record matching
//!    the caller and cause, in batches of at most
//!    [`MAX_BATCH_WRITE_ITEMS`](super::batching::MAX_BATCH_WRITE_ITEMS);
//! 2. the counter adjuster applies a conditional `-1` to the cause's
//!    `follower_count`.
//!
//! A failure in step 2 leaves step 1 committed. Both steps are exposed so
//! callers and the reconciliation job can drive them separately.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::batching::{BatchReport, BatchSize, BatchSubmitError, submit_in_batches};
use crate::domain::ports::{
    CauseRepository, CauseRepositoryError, CounterAdjustment, UnfollowCauseCommand,
    UnfollowCauseRequest, UnfollowOutcome, UserCauseRepository, UserCauseRepositoryError,
};
use crate::domain::{CauseId, Error, UserId};

const STAGE_REMOVE: &str = "remove_associations";
const STAGE_ADJUST: &str = "adjust_counter";

/// Decides whether the counter is decremented when no association existed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecrementPolicy {
    /// Decrement after every successful removal step, even an empty one.
    #[default]
    Always,
    /// Decrement only when at least one association was deleted.
    WhenRemoved,
}

impl DecrementPolicy {
    fn should_decrement(self, removed: usize) -> bool {
        match self {
            Self::Always => true,
            Self::WhenRemoved => removed > 0,
        }
    }
}

/// Error returned when parsing an unknown [`DecrementPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown decrement policy `{0}`; expected `always` or `when_removed`")]
pub struct ParseDecrementPolicyError(String);

impl FromStr for DecrementPolicy {
    type Err = ParseDecrementPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always" => Ok(Self::Always),
            "when_removed" => Ok(Self::WhenRemoved),
            other => Err(ParseDecrementPolicyError(other.to_owned())),
        }
    }
}

impl fmt::Display for DecrementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Always => "always",
            Self::WhenRemoved => "when_removed",
        })
    }
}

/// Domain service implementing [`UnfollowCauseCommand`].
#[derive(Clone)]
pub struct UnfollowCauseService<U, C> {
    user_causes: Arc<U>,
    causes: Arc<C>,
    policy: DecrementPolicy,
    batch_size: BatchSize,
}

impl<U, C> UnfollowCauseService<U, C> {
    /// Create a service with the default policy and the store batch limit.
    pub fn new(user_causes: Arc<U>, causes: Arc<C>) -> Self {
        Self {
            user_causes,
            causes,
            policy: DecrementPolicy::default(),
            batch_size: BatchSize::default(),
        }
    }

    /// Override the decrement policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DecrementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the batch size used when deleting associations.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: BatchSize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Configured decrement policy.
    pub fn policy(&self) -> DecrementPolicy {
        self.policy
    }
}

impl<U, C> UnfollowCauseService<U, C>
where
    U: UserCauseRepository,
    C: CauseRepository,
{
    /// Delete every association between `user_id` and `cause_id`.
    ///
    /// Deletes are built from the keys the store returns. A failing batch
    /// stops the sequence; earlier batches stay committed.
    pub async fn remove_associations(
        &self,
        user_id: &UserId,
        cause_id: &CauseId,
    ) -> Result<BatchReport, Error> {
        let keys = self
            .user_causes
            .find_keys(user_id, cause_id)
            .await
            .map_err(|err| {
                error!(%user_id, %cause_id, stage = STAGE_REMOVE, error = %err, "association query failed");
                Self::map_query_error(err)
            })?;

        let user_causes = Arc::clone(&self.user_causes);
        submit_in_batches(keys, self.batch_size, move |batch| {
            let repo = Arc::clone(&user_causes);
            async move { repo.delete_batch(batch).await }
        })
        .await
        .map_err(|err| {
            error!(
                %user_id,
                %cause_id,
                stage = STAGE_REMOVE,
                committed_batches = err.committed.batches,
                error = %err.source,
                "association batch delete failed"
            );
            Self::map_batch_error(err)
        })
    }

    /// Apply a conditional `-1` to the cause's follower count.
    ///
    /// Fails when the cause row does not exist. No floor is applied.
    pub async fn adjust_follower_count(
        &self,
        user_id: &UserId,
        cause_id: &CauseId,
    ) -> Result<(), Error> {
        self.causes
            .adjust_follower_count(cause_id, -1)
            .await
            .map_err(|err| {
                error!(%user_id, %cause_id, stage = STAGE_ADJUST, error = %err, "follower count update failed");
                Self::map_cause_error(err)
            })
    }

    fn map_query_error(error: UserCauseRepositoryError) -> Error {
        Error::internal(format!("failed to query user causes: {error}")).with_details(json!({
            "stage": STAGE_REMOVE,
            "kind": "store_error",
        }))
    }

    fn map_batch_error(error: BatchSubmitError<UserCauseRepositoryError>) -> Error {
        Error::internal(format!("failed to delete user causes: {}", error.source)).with_details(
            json!({
                "stage": STAGE_REMOVE,
                "kind": "store_error",
                "committedBatches": error.committed.batches,
                "committedItems": error.committed.items,
            }),
        )
    }

    fn map_cause_error(error: CauseRepositoryError) -> Error {
        let kind = match error {
            CauseRepositoryError::ConditionFailed { .. } => "precondition_failed",
            CauseRepositoryError::Connection { .. } | CauseRepositoryError::Query { .. } => {
                "store_error"
            }
        };
        Error::internal(format!("failed to update follower count: {error}")).with_details(json!({
            "stage": STAGE_ADJUST,
            "kind": kind,
        }))
    }
}

#[async_trait]
impl<U, C> UnfollowCauseCommand for UnfollowCauseService<U, C>
where
    U: UserCauseRepository,
    C: CauseRepository,
{
    async fn unfollow(&self, request: UnfollowCauseRequest) -> Result<UnfollowOutcome, Error> {
        let UnfollowCauseRequest { user_id, cause_id } = request;

        let removed = self.remove_associations(&user_id, &cause_id).await?;

        let counter = if self.policy.should_decrement(removed.items) {
            self.adjust_follower_count(&user_id, &cause_id).await?;
            CounterAdjustment::Decremented
        } else {
            CounterAdjustment::Skipped
        };

        info!(
            %user_id,
            %cause_id,
            associations_removed = removed.items,
            batches = removed.batches,
            counter = ?counter,
            "cause unfollowed"
        );

        Ok(UnfollowOutcome {
            associations_removed: removed.items,
            batches_submitted: removed.batches,
            counter,
        })
    }
}

#[cfg(test)]
#[path = "unfollow_tests.rs"]
mod tests;
