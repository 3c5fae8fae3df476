//! Follower count reconciliation.
//!
//! The unfollow cascade can leave `follower_count` out of step with the live
//! `user_causes` records: a decrement may fail after the associations were
//! deleted, redelivered requests decrement twice, and the counter has no
//! floor. The reconciler recomputes the count from the relationship store
//! and overwrites the stored value when they differ.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CauseRepository, CauseRepositoryError, UserCauseRepository, UserCauseRepositoryError,
};
use crate::domain::{CauseId, Error};

/// Result of reconciling one cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Cause that was inspected.
    pub cause_id: CauseId,
    /// Counter value before reconciliation.
    pub stored: i64,
    /// Number of live association records.
    pub live: i64,
    /// Whether the stored counter was overwritten.
    pub corrected: bool,
}

impl ReconciliationReport {
    /// Signed difference between the stored counter and the live count,
    /// saturating at the bounds of `i64`.
    pub fn drift(&self) -> i64 {
        self.stored.saturating_sub(self.live)
    }
}

/// Recomputes follower counters from the relationship store.
#[derive(Clone)]
pub struct FollowerCountReconciler<U, C> {
    user_causes: Arc<U>,
    causes: Arc<C>,
    dry_run: bool,
}

impl<U, C> FollowerCountReconciler<U, C> {
    /// Create a reconciler that writes corrections.
    pub fn new(user_causes: Arc<U>, causes: Arc<C>) -> Self {
        Self {
            user_causes,
            causes,
            dry_run: false,
        }
    }

    /// Report drift without writing corrections.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl<U, C> FollowerCountReconciler<U, C>
where
    U: UserCauseRepository,
    C: CauseRepository,
{
    /// Compare the stored counter with the live association count.
    pub async fn reconcile(&self, cause_id: &CauseId) -> Result<ReconciliationReport, Error> {
        let stored = self
            .causes
            .follower_count(cause_id)
            .await
            .map_err(map_cause_error)?
            .ok_or_else(|| {
                Error::invalid_request(format!("cause {cause_id} does not exist"))
                    .with_details(json!({ "causeId": cause_id.as_ref() }))
            })?;

        let live = self
            .user_causes
            .count_for_cause(cause_id)
            .await
            .map_err(map_user_cause_error)?;
        let live = i64::try_from(live)
            .map_err(|_| Error::internal(format!("association count for {cause_id} overflows")))?;

        let mut report = ReconciliationReport {
            cause_id: cause_id.clone(),
            stored,
            live,
            corrected: false,
        };
        if report.drift() == 0 {
            info!(%cause_id, follower_count = stored, "follower count consistent");
            return Ok(report);
        }

        warn!(%cause_id, stored, live, dry_run = self.dry_run, "follower count drift detected");
        if !self.dry_run {
            self.causes
                .set_follower_count(cause_id, live)
                .await
                .map_err(map_cause_error)?;
            report.corrected = true;
        }
        Ok(report)
    }
}

fn map_cause_error(error: CauseRepositoryError) -> Error {
    Error::internal(format!("causes store error: {error}"))
}

fn map_user_cause_error(error: UserCauseRepositoryError) -> Error {
    Error::internal(format!("user_causes store error: {error}"))
}
