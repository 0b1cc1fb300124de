//! Task endpoints. Every successful write is followed by a realtime event.

use super::error::ApiError;
use super::extract::{AdminIdentity, CurrentIdentity, Json, Path, Query};
use super::state::AppState;
use crate::identity::domain::UserId;
use crate::realtime::{
    ServerEvent,
    events::{StatusChanged, TaskAssigned, TaskDeleted, UpdateAdded},
};
use crate::task::domain::{
    AssigneeFilter, ProgressState, ProgressUpdateEntry, TaskDetail, TaskFilter, TaskId,
    TaskPriority, TaskStats, TaskStatus, TaskSummary,
};
use crate::task::services::{AddProgressUpdateRequest, CreateTaskRequest, UpdateTaskRequest};
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

/// Query string of `GET /tasks`.
///
/// `assigned_to=null` selects unassigned tasks. Blank values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    status: Option<String>,
    assigned_to: Option<String>,
    priority: Option<String>,
    progress_state: Option<String>,
}

impl TaskListQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let mut filter = TaskFilter::new();
        if let Some(status) = present(self.status.as_deref()) {
            filter = filter.with_status(TaskStatus::try_from(status)?);
        }
        if let Some(priority) = present(self.priority.as_deref()) {
            filter = filter.with_priority(TaskPriority::try_from(priority)?);
        }
        if let Some(state) = present(self.progress_state.as_deref()) {
            filter = filter.with_progress_state(ProgressState::try_from(state)?);
        }
        if let Some(assignee) = present(self.assigned_to.as_deref()) {
            filter = filter.with_assignee(parse_assignee(assignee)?);
        }
        Ok(filter)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn parse_assignee(raw: &str) -> Result<AssigneeFilter, ApiError> {
    if raw == "null" {
        return Ok(AssigneeFilter::Unassigned);
    }
    raw.parse::<i64>()
        .map(|id| AssigneeFilter::User(UserId::new(id)))
        .map_err(|_| ApiError::Validation(format!("Invalid assigned_to filter: {raw}")))
}

/// Body of `POST /tasks/{id}/assign`; an absent or null assignee unassigns.
#[derive(Debug, Default, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    assigned_to: Option<UserId>,
}

/// Body of `PATCH /tasks/{id}/status`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    status: Option<String>,
}

/// `GET /tasks`
pub async fn list(
    State(state): State<AppState>,
    _caller: CurrentIdentity,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskSummary>>, ApiError> {
    let filter = query.into_filter()?;
    Ok(Json(state.ledger.list(&filter).await?))
}

/// `GET /tasks/{id}`
pub async fn get(
    State(state): State<AppState>,
    _caller: CurrentIdentity,
    Path(id): Path<TaskId>,
) -> Result<Json<TaskDetail>, ApiError> {
    Ok(Json(state.ledger.get(id).await?))
}

/// `POST /tasks`
pub async fn create(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskDetail>), ApiError> {
    let task = state.ledger.create(request, caller.id).await?;
    state.hub.publish(ServerEvent::TaskCreated(task.clone()));
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(id): Path<TaskId>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskDetail>, ApiError> {
    let task = state.ledger.update(id, request, caller.id).await?;
    state.hub.publish(ServerEvent::TaskUpdated(task.clone()));
    Ok(Json(task))
}

/// `DELETE /tasks/{id}` (administrators only)
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<TaskId>,
) -> Result<Json<Value>, ApiError> {
    state.ledger.delete(id).await?;
    state.hub.publish(ServerEvent::TaskDeleted(TaskDeleted { id }));
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// `POST /tasks/{id}/updates`
pub async fn add_update(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(task_id): Path<TaskId>,
    Json(request): Json<AddProgressUpdateRequest>,
) -> Result<(StatusCode, Json<ProgressUpdateEntry>), ApiError> {
    let update = state.ledger.add_update(task_id, request, caller.id).await?;
    let task = state.ledger.get(task_id).await?;
    state.hub.publish(ServerEvent::TaskUpdateAdded(UpdateAdded {
        task_id,
        update: update.clone(),
        task,
    }));
    Ok((StatusCode::CREATED, Json(update)))
}

/// `GET /tasks/stats/overview`
pub async fn stats(
    State(state): State<AppState>,
    _caller: CurrentIdentity,
) -> Result<Json<TaskStats>, ApiError> {
    Ok(Json(state.ledger.stats().await?))
}

/// `POST /tasks/{id}/assign`
pub async fn assign(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(task_id): Path<TaskId>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<TaskDetail>, ApiError> {
    let task = state
        .ledger
        .assign(task_id, request.assigned_to, caller.id)
        .await?;
    state.hub.publish(ServerEvent::TaskAssigned(TaskAssigned {
        task_id,
        assigned_to: request.assigned_to,
        assigned_by_name: caller.name.as_str().to_owned(),
        task: task.clone(),
    }));
    Ok(Json(task))
}

/// `PATCH /tasks/{id}/status`
pub async fn change_status(
    State(state): State<AppState>,
    CurrentIdentity(caller): CurrentIdentity,
    Path(task_id): Path<TaskId>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<TaskDetail>, ApiError> {
    let raw = request
        .status
        .ok_or_else(|| ApiError::Validation("Status is required".to_owned()))?;
    let task = state.ledger.change_status(task_id, &raw, caller.id).await?;
    state.hub.publish(ServerEvent::TaskStatusChanged(StatusChanged {
        task_id,
        status: task.task().status(),
        changed_by_name: caller.name.as_str().to_owned(),
        task: task.clone(),
    }));
    Ok(Json(task))
}
