//! `PostgreSQL` repository implementation for the task ledger.

use super::models::{NewTaskRow, NewUpdateRow, StatsRow, TaskChangeset, TaskRow, UpdateRow};
use crate::identity::domain::UserId;
use crate::persistence::{
    PgPool,
    postgres::run_blocking,
    schema::{tasks, updates, users},
};
use crate::task::{
    domain::{
        AssigneeFilter, NewProgressUpdate, NewTask, PersistedTaskData, ProgressState,
        ProgressUpdateEntry, Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStats,
        TaskStatus, TaskSummary, TaskTitle, UpdateId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

const TASK_ASSIGNEE_FK: &str = "tasks_assigned_to_fkey";
const TASK_CREATOR_FK: &str = "tasks_created_by_fkey";
const UPDATE_TASK_FK: &str = "updates_task_id_fkey";

const STATS_SQL: &str = concat!(
    "SELECT COUNT(*) AS total, ",
    "COUNT(*) FILTER (WHERE status = 'activo') AS active, ",
    "COUNT(*) FILTER (WHERE status = 'inactivo') AS inactive, ",
    "COUNT(*) FILTER (WHERE status = 'finalizado') AS completed, ",
    "COUNT(*) FILTER (WHERE assigned_to IS NULL) AS unassigned ",
    "FROM tasks",
);

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskSummary>> {
        let criteria = *filter;
        run_blocking(&self.pool, move |connection| {
            let mut query = tasks::table.into_boxed();
            if let Some(status) = criteria.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            match criteria.assignee {
                Some(AssigneeFilter::Unassigned) => {
                    query = query.filter(tasks::assigned_to.is_null());
                }
                Some(AssigneeFilter::User(id)) => {
                    query = query.filter(tasks::assigned_to.eq(id.value()));
                }
                None => {}
            }
            if let Some(priority) = criteria.priority {
                query = query.filter(tasks::priority.eq(priority.as_str()));
            }
            if let Some(state) = criteria.progress_state {
                query = query.filter(tasks::progress_state.eq(state.as_str()));
            }

            let rows = query
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let tasks = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            summarize_all(connection, tasks)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskSummary>> {
        run_blocking(&self.pool, move |connection| {
            let found = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            let Some(row) = found else {
                return Ok(None);
            };
            let summaries = summarize_all(connection, vec![row_to_task(row)?])?;
            Ok(summaries.into_iter().next())
        })
        .await
    }

    async fn list_updates(&self, id: TaskId) -> TaskRepositoryResult<Vec<ProgressUpdateEntry>> {
        run_blocking(&self.pool, move |connection| {
            // Inner join: updates whose author was deleted are not listed.
            let rows = updates::table
                .inner_join(users::table)
                .filter(updates::task_id.eq(id.value()))
                .order((updates::timestamp.desc(), updates::id.desc()))
                .select((UpdateRow::as_select(), users::name))
                .load::<(UpdateRow, String)>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter()
                .map(|(row, user_name)| row_to_entry(row, user_name))
                .collect()
        })
        .await
    }

    async fn find_update(&self, id: UpdateId) -> TaskRepositoryResult<Option<ProgressUpdateEntry>> {
        run_blocking(&self.pool, move |connection| {
            let found = updates::table
                .inner_join(users::table)
                .filter(updates::id.eq(id.value()))
                .select((UpdateRow::as_select(), users::name))
                .first::<(UpdateRow, String)>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            found
                .map(|(row, user_name)| row_to_entry(row, user_name))
                .transpose()
        })
        .await
    }

    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        run_blocking(&self.pool, move |connection| {
            diesel::select(diesel::dsl::exists(
                tasks::table.filter(tasks::id.eq(id.value())),
            ))
            .get_result::<bool>(connection)
            .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<TaskId> {
        let creator = task.created_by();
        let assignee = task.assigned_to();
        let new_row = NewTaskRow {
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            status: TaskStatus::default().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            assigned_to: assignee.map(UserId::value),
            created_by: creator.value(),
            created_at: task.created_at(),
            updated_at: task.created_at(),
            due_date: task.due_date(),
            progress_state: ProgressState::default().as_str().to_owned(),
        };

        run_blocking(&self.pool, move |connection| {
            let id = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(tasks::id)
                .get_result::<i64>(connection)
                .map_err(|err| match (violated_foreign_key(&err).as_deref(), assignee) {
                    (Some(TASK_ASSIGNEE_FK), Some(missing)) => {
                        TaskRepositoryError::UnknownUser(missing)
                    }
                    (Some(TASK_CREATOR_FK), _) => TaskRepositoryError::UnknownUser(creator),
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(TaskId::new(id))
        })
        .await
    }

    async fn apply_patch(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        let new_assignee = patch.assigned_to().flatten();
        let changeset = TaskChangeset {
            title: patch.title().map(|title| title.as_str().to_owned()),
            description: patch.description().map(str::to_owned),
            status: patch.status().map(|status| status.as_str().to_owned()),
            priority: patch.priority().map(|priority| priority.as_str().to_owned()),
            assigned_to: patch
                .assigned_to()
                .map(|assignee| assignee.map(UserId::value)),
            due_date: patch.due_date(),
            progress_state: patch.progress_state().map(|state| state.as_str().to_owned()),
            updated_at: Some(updated_at),
        };

        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set(&changeset)
                .execute(connection)
                .map_err(|err| match (violated_foreign_key(&err), new_assignee) {
                    (Some(_), Some(missing)) => TaskRepositoryError::UnknownUser(missing),
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(affected > 0)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        run_blocking(&self.pool, move |connection| {
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn insert_update(&self, update: &NewProgressUpdate) -> TaskRepositoryResult<UpdateId> {
        let task_id = update.task_id();
        let author = update.user_id();
        let new_row = NewUpdateRow {
            task_id: task_id.value(),
            user_id: author.value(),
            comment: update.comment().to_owned(),
            progress_state: update.stored_state().as_str().to_owned(),
            timestamp: update.timestamp(),
        };

        run_blocking(&self.pool, move |connection| {
            let id = diesel::insert_into(updates::table)
                .values(&new_row)
                .returning(updates::id)
                .get_result::<i64>(connection)
                .map_err(|err| match violated_foreign_key(&err).as_deref() {
                    Some(UPDATE_TASK_FK) => TaskRepositoryError::NotFound(task_id),
                    Some(_) => TaskRepositoryError::UnknownUser(author),
                    None => TaskRepositoryError::persistence(err),
                })?;
            Ok(UpdateId::new(id))
        })
        .await
    }

    async fn set_progress_state(
        &self,
        id: TaskId,
        state: ProgressState,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set((
                    tasks::progress_state.eq(state.as_str()),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        run_blocking(&self.pool, move |connection| {
            let row = diesel::sql_query(STATS_SQL)
                .get_result::<StatsRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(TaskStats {
                total: to_count(row.total)?,
                active: to_count(row.active)?,
                inactive: to_count(row.inactive)?,
                completed: to_count(row.completed)?,
                unassigned: to_count(row.unassigned)?,
            })
        })
        .await
    }
}

/// Returns the violated foreign-key constraint, if `err` is such a violation.
fn violated_foreign_key(err: &DieselError) -> Option<String> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => Some(
            info.constraint_name()
                .map(str::to_owned)
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

fn to_count(value: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(value).map_err(TaskRepositoryError::invalid_persisted_data)
}

/// Joins tasks with their creator and assignee names in one lookup.
fn summarize_all(
    connection: &mut PgConnection,
    tasks: Vec<Task>,
) -> TaskRepositoryResult<Vec<TaskSummary>> {
    let mut user_ids: Vec<i64> = tasks
        .iter()
        .flat_map(|task| {
            task.created_by()
                .into_iter()
                .chain(task.assigned_to())
                .map(UserId::value)
        })
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let names: HashMap<i64, String> = users::table
        .filter(users::id.eq_any(user_ids))
        .select((users::id, users::name))
        .load::<(i64, String)>(connection)
        .map_err(TaskRepositoryError::persistence)?
        .into_iter()
        .collect();

    Ok(tasks
        .into_iter()
        .map(|task| TaskSummary {
            creator_name: task
                .created_by()
                .and_then(|id| names.get(&id.value()).cloned()),
            assigned_name: task
                .assigned_to()
                .and_then(|id| names.get(&id.value()).cloned()),
            task,
        })
        .collect())
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        assigned_to,
        created_by,
        created_at,
        updated_at,
        due_date,
        progress_state,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::invalid_persisted_data)?,
        description,
        status: TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        priority: TaskPriority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        assigned_to: assigned_to.map(UserId::new),
        created_by: created_by.map(UserId::new),
        created_at,
        updated_at,
        due_date,
        progress_state: ProgressState::try_from(progress_state.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_entry(row: UpdateRow, user_name: String) -> TaskRepositoryResult<ProgressUpdateEntry> {
    let progress_state = ProgressState::try_from(row.progress_state.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(ProgressUpdateEntry {
        id: UpdateId::new(row.id),
        comment: row.comment,
        progress_state,
        timestamp: row.timestamp,
        user_name,
    })
}
