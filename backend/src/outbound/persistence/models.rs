//! Internal Diesel row structs. Never exposed to the domain.

use diesel::prelude::*;

use super::schema::{causes, user_causes};

/// Key columns of a `user_causes` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_causes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCauseRow {
    pub user_id: String,
    pub cause_id: String,
}

/// Counter column of a `causes` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = causes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CauseCounterRow {
    pub follower_count: Option<i64>,
}
