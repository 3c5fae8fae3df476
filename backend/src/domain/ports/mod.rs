//! Domain ports for the hexagonal boundary.
//!
//! Driven ports describe the two stores touched by the unfollow cascade;
//! the driving port is what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod cause_repository;
mod unfollow_cause_command;
mod user_cause_repository;

#[cfg(test)]
pub use cause_repository::MockCauseRepository;
pub use cause_repository::{CauseRepository, CauseRepositoryError};
#[cfg(test)]
pub use unfollow_cause_command::MockUnfollowCauseCommand;
pub use unfollow_cause_command::{
    CounterAdjustment, FixtureUnfollowCauseCommand, UnfollowCauseCommand, UnfollowCauseRequest,
    UnfollowOutcome,
};
#[cfg(test)]
pub use user_cause_repository::MockUserCauseRepository;
pub use user_cause_repository::{UserCauseRepository, UserCauseRepositoryError};
