//! Driving port for the unfollow use-case.
//!
//! Inbound adapters hand over an authenticated caller and a validated cause
//! id; the domain removes the association records and adjusts the cause's
//! follower counter. The outcome reports both steps so callers and
//! supervisors can see how far the cascade went.

use async_trait::async_trait;

use crate::domain::{CauseId, Error, UserId};

/// Input to [`UnfollowCauseCommand::unfollow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfollowCauseRequest {
    /// Authenticated caller whose association is removed.
    pub user_id: UserId,
    /// Cause being unfollowed.
    pub cause_id: CauseId,
}

/// What happened to the cause's follower counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAdjustment {
    /// A conditional decrement was applied.
    Decremented,
    /// The decrement was skipped by policy because nothing was removed.
    Skipped,
}

/// Result of a completed cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnfollowOutcome {
    /// Association records deleted by the remover.
    pub associations_removed: usize,
    /// Batch writes submitted to the relationship store.
    pub batches_submitted: usize,
    /// Counter step result.
    pub counter: CounterAdjustment,
}

/// Domain use-case port for unfollowing a cause.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnfollowCauseCommand: Send + Sync {
    /// Remove the caller's association with the cause and adjust its counter.
    async fn unfollow(&self, request: UnfollowCauseRequest) -> Result<UnfollowOutcome, Error>;
}

/// Fixture command that reports a single removed association.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUnfollowCauseCommand;

#[async_trait]
impl UnfollowCauseCommand for FixtureUnfollowCauseCommand {
    async fn unfollow(&self, _request: UnfollowCauseRequest) -> Result<UnfollowOutcome, Error> {
        Ok(UnfollowOutcome {
            associations_removed: 1,
            batches_submitted: 1,
            counter: CounterAdjustment::Decremented,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_single_removal() {
        let request = UnfollowCauseRequest {
            user_id: UserId::new("user123").expect("user id"),
            cause_id: CauseId::new("cause456").expect("cause id"),
        };

        let outcome = FixtureUnfollowCauseCommand
            .unfollow(request)
            .await
            .expect("fixture succeeds");

        assert_eq!(outcome.associations_removed, 1);
        assert_eq!(outcome.counter, CounterAdjustment::Decremented);
    }
}
