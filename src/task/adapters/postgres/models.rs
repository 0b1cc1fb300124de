//! Diesel row models for task and progress-update persistence.

use crate::persistence::schema::{tasks, updates};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Auto-increment identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Optional assignee.
    pub assigned_to: Option<i64>,
    /// Creating user, cleared when the user is deleted.
    pub created_by: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Progress-state token.
    pub progress_state: String,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task title.
    pub title: String,
    /// Description text, empty when omitted.
    pub description: String,
    /// Initial status token.
    pub status: String,
    /// Priority token.
    pub priority: String,
    /// Optional assignee.
    pub assigned_to: Option<i64>,
    /// Creating user.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// First mutation timestamp, equal to `created_at`.
    pub updated_at: DateTime<Utc>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Initial progress-state token.
    pub progress_state: String,
}

/// Partial update of a task row.
///
/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable
/// column.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status token.
    pub status: Option<String>,
    /// New priority token.
    pub priority: Option<String>,
    /// New assignee; `Some(None)` unassigns.
    pub assigned_to: Option<Option<i64>>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<NaiveDate>>,
    /// New progress-state token.
    pub progress_state: Option<String>,
    /// Mutation timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Query result row for progress updates.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateRow {
    /// Auto-increment identifier.
    pub id: i64,
    /// Comment text.
    pub comment: String,
    /// Progress-state token.
    pub progress_state: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Insert model for progress updates.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = updates)]
pub struct NewUpdateRow {
    /// Parent task.
    pub task_id: i64,
    /// Authoring user.
    pub user_id: i64,
    /// Comment text, empty when omitted.
    pub comment: String,
    /// Progress-state token recorded with the update.
    pub progress_state: String,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Aggregate counts returned by the stats query.
#[derive(Debug, Clone, QueryableByName)]
pub struct StatsRow {
    /// Number of tasks.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub total: i64,
    /// Tasks with status `activo`.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub active: i64,
    /// Tasks with status `inactivo`.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub inactive: i64,
    /// Tasks with status `finalizado`.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub completed: i64,
    /// Tasks without an assignee.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub unassigned: i64,
}
