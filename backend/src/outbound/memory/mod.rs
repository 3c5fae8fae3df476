//! In-process store implementing both cascade ports.
//!
//! Used when no database is configured and by integration tests. Every port
//! call is appended to a journal so callers can assert exactly which store
//! operations a request performed. Failures can be injected per operation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CauseRepository, CauseRepositoryError, UserCauseRepository, UserCauseRepositoryError,
};
use crate::domain::{CauseId, UserCauseKey, UserId};

/// Port call recorded by [`InMemoryCauseStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    FindKeys { user_id: UserId, cause_id: CauseId },
    DeleteBatch { keys: Vec<UserCauseKey> },
    CountForCause { cause_id: CauseId },
    AdjustFollowerCount { cause_id: CauseId, delta: i64 },
    ReadFollowerCount { cause_id: CauseId },
    SetFollowerCount { cause_id: CauseId, value: i64 },
}

/// Operation that should fail on its next invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    FindKeys,
    DeleteBatch,
    AdjustFollowerCount,
}

#[derive(Debug, Default)]
struct State {
    associations: BTreeSet<UserCauseKey>,
    causes: HashMap<CauseId, Option<i64>>,
    journal: Vec<StoreOperation>,
    failures: HashSet<FailurePoint>,
}

impl State {
    fn injected(&self, point: FailurePoint) -> bool {
        self.failures.contains(&point)
    }
}

/// Shared in-memory `user_causes` and `causes` tables.
#[derive(Debug, Default)]
pub struct InMemoryCauseStore {
    state: Mutex<State>,
}

impl InMemoryCauseStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or replace a cause row.
    pub fn insert_cause(&self, cause_id: CauseId, follower_count: Option<i64>) {
        self.lock().causes.insert(cause_id, follower_count);
    }

    /// Record that `key.user_id` follows `key.cause_id`.
    pub fn insert_association(&self, key: UserCauseKey) {
        self.lock().associations.insert(key);
    }

    /// Whether the association exists.
    pub fn has_association(&self, key: &UserCauseKey) -> bool {
        self.lock().associations.contains(key)
    }

    /// Raw stored counter: `None` when the cause is absent, `Some(None)` when
    /// the row has no count.
    pub fn stored_follower_count(&self, cause_id: &CauseId) -> Option<Option<i64>> {
        self.lock().causes.get(cause_id).copied()
    }

    /// Make `point` fail until [`clear_failures`](Self::clear_failures).
    pub fn fail_on(&self, point: FailurePoint) {
        self.lock().failures.insert(point);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Journal of port calls in invocation order.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.lock().journal.clone()
    }
}

#[async_trait]
impl UserCauseRepository for InMemoryCauseStore {
    async fn find_keys(
        &self,
        user_id: &UserId,
        cause_id: &CauseId,
    ) -> Result<Vec<UserCauseKey>, UserCauseRepositoryError> {
        let mut state = self.lock();
        state.journal.push(StoreOperation::FindKeys {
            user_id: user_id.clone(),
            cause_id: cause_id.clone(),
        });
        if state.injected(FailurePoint::FindKeys) {
            return Err(UserCauseRepositoryError::query("injected query failure"));
        }
        Ok(state
            .associations
            .iter()
            .filter(|key| &key.user_id == user_id && &key.cause_id == cause_id)
            .cloned()
            .collect())
    }

    async fn delete_batch(&self, keys: Vec<UserCauseKey>) -> Result<(), UserCauseRepositoryError> {
        let mut state = self.lock();
        state
            .journal
            .push(StoreOperation::DeleteBatch { keys: keys.clone() });
        if state.injected(FailurePoint::DeleteBatch) {
            return Err(UserCauseRepositoryError::query("injected batch failure"));
        }
        let deleted = keys
            .iter()
            .filter(|key| state.associations.remove(*key))
            .count();
        debug!(requested = keys.len(), deleted, "in-memory batch delete");
        Ok(())
    }

    async fn count_for_cause(&self, cause_id: &CauseId) -> Result<u64, UserCauseRepositoryError> {
        let mut state = self.lock();
        state.journal.push(StoreOperation::CountForCause {
            cause_id: cause_id.clone(),
        });
        let count = state
            .associations
            .iter()
            .filter(|key| &key.cause_id == cause_id)
            .count();
        u64::try_from(count).map_err(|err| UserCauseRepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl CauseRepository for InMemoryCauseStore {
    async fn adjust_follower_count(
        &self,
        cause_id: &CauseId,
        delta: i64,
    ) -> Result<(), CauseRepositoryError> {
        let mut state = self.lock();
        state.journal.push(StoreOperation::AdjustFollowerCount {
            cause_id: cause_id.clone(),
            delta,
        });
        if state.injected(FailurePoint::AdjustFollowerCount) {
            return Err(CauseRepositoryError::query("injected update failure"));
        }
        let Some(count) = state.causes.get_mut(cause_id) else {
            return Err(CauseRepositoryError::condition_failed(cause_id.as_ref()));
        };
        *count = Some(count.unwrap_or(0) + delta);
        Ok(())
    }

    async fn follower_count(&self, cause_id: &CauseId) -> Result<Option<i64>, CauseRepositoryError> {
        let mut state = self.lock();
        state.journal.push(StoreOperation::ReadFollowerCount {
            cause_id: cause_id.clone(),
        });
        Ok(state.causes.get(cause_id).map(|count| count.unwrap_or(0)))
    }

    async fn set_follower_count(
        &self,
        cause_id: &CauseId,
        value: i64,
    ) -> Result<(), CauseRepositoryError> {
        let mut state = self.lock();
        state.journal.push(StoreOperation::SetFollowerCount {
            cause_id: cause_id.clone(),
            value,
        });
        let Some(count) = state.causes.get_mut(cause_id) else {
            return Err(CauseRepositoryError::condition_failed(cause_id.as_ref()));
        };
        *count = Some(value);
        Ok(())
    }
}
