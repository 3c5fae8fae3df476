//! Domain types and services for the user cause unfollow cascade.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - UserId, CauseId, UserCauseKey: validated identifiers.
//! - UnfollowCauseService: association remover and counter adjuster.
//! - FollowerCountReconciler: repairs counter drift.
//! - TraceId: request correlation carried in task-local storage.

pub mod batching;
pub mod cause;
pub mod error;
pub mod ports;
pub mod reconciliation;
pub mod trace_id;
pub mod unfollow;
pub mod user;

pub use self::cause::{CauseId, CauseIdValidationError, UserCauseKey};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::reconciliation::{FollowerCountReconciler, ReconciliationReport};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::unfollow::{DecrementPolicy, ParseDecrementPolicyError, UnfollowCauseService};
pub use self::user::{UserId, UserIdValidationError};
