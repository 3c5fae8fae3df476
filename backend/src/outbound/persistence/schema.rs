//! Diesel table definitions.
//!
//! Must match `backend/migrations`; regenerate with `diesel print-schema`
//! when a migration changes a table.

diesel::table! {
    /// Cause entities holding the denormalised follower counter.
    causes (cause_id) {
        cause_id -> Varchar,
        /// Absent until the first follow; read as zero.
        follower_count -> Nullable<Int8>,
    }
}

diesel::table! {
    /// One row per user following a cause.
    user_causes (user_id, cause_id) {
        user_id -> Varchar,
        cause_id -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(causes, user_causes);
