//! User management endpoints.

use super::error::ApiError;
use super::extract::{AdminIdentity, CurrentIdentity, Json, Path};
use super::state::AppState;
use crate::identity::domain::{User, UserId};
use crate::identity::services::{CreateUserRequest, IdentityError, UpdateUserRequest};
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// `GET /users` (administrators only)
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.directory.list_all().await?))
}

/// `GET /users/role/{role}`
pub async fn list_by_role(
    State(state): State<AppState>,
    _caller: CurrentIdentity,
    Path(role): Path<String>,
) -> Result<Json<Vec<User>>, ApiError> {
    match state.directory.list_by_role(&role).await {
        Ok(users) => Ok(Json(users)),
        Err(IdentityError::Domain(_)) => Err(ApiError::Validation("Invalid role".to_owned())),
        Err(err) => Err(err.into()),
    }
}

/// `GET /users/me`
pub async fn me(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.directory.get(identity.id).await?))
}

/// `POST /users` (administrators only)
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.directory.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/{id}` (administrators only)
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<UserId>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.directory.update(id, request).await?))
}

/// `DELETE /users/{id}` (administrators only)
pub async fn delete(
    State(state): State<AppState>,
    AdminIdentity(admin): AdminIdentity,
    Path(id): Path<UserId>,
) -> Result<Json<Value>, ApiError> {
    state.directory.delete(id, admin.id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
