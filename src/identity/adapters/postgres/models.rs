//! Diesel row models for user persistence.

use crate::persistence::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Auto-increment identifier.
    pub id: i64,
    /// Unique login name.
    pub name: String,
    /// Role token.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Unique login name.
    pub name: String,
    /// Role token.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
