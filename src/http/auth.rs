//! Login, logout, and session status endpoints.

use super::error::ApiError;
use super::extract::{CurrentIdentity, Json, SESSION_COOKIE, session_id};
use super::state::AppState;
use crate::session::domain::{AuthenticatedIdentity, Session};
use crate::session::services::SessionError;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Body of `POST /auth/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    name: Option<String>,
}

/// Body of `GET /auth/status`.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<AuthenticatedIdentity>,
}

/// Cookie carrying the session id; it lives exactly as long as the session.
fn session_cookie(session: &Session, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let (session, user) = state
        .gate
        .login(request.name.as_deref(), session_id(&jar))
        .await?;
    let identity = AuthenticatedIdentity::from(&user);
    let cookie = session_cookie(&session, state.gate.ttl());
    Ok((
        jar.add(cookie),
        Json(json!({ "message": "Login successful", "user": identity })),
    ))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    state.gate.logout(session_id(&jar)).await?;
    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(json!({ "message": "Logout successful" })),
    ))
}

/// `GET /auth/status`
pub async fn status(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionStatus>, ApiError> {
    let user = state.gate.status(session_id(&jar)).await?;
    Ok(Json(SessionStatus {
        authenticated: user.is_some(),
        user,
    }))
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Value>, ApiError> {
    let user = match state.gate.current_user(&identity).await {
        Ok(user) => user,
        Err(SessionError::Unauthorized) => {
            return Err(ApiError::Unauthorized("User not found".to_owned()));
        }
        Err(err) => return Err(err.into()),
    };
    Ok(Json(json!({ "user": AuthenticatedIdentity::from(&user) })))
}
