//! Request extractors: JSON and path wrappers with JSON errors, and
//! session-backed identity.

use super::error::ApiError;
use super::state::AppState;
use crate::session::domain::{AuthenticatedIdentity, SessionId};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde::Serialize;

/// Name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "taskboard_sid";

/// JSON body extractor and responder whose rejections are [`ApiError`]s.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path extractor whose rejections are [`ApiError`]s.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Query-string extractor whose rejections are [`ApiError`]s.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Reads the session identifier from the cookie jar, ignoring garbage.
#[must_use]
pub fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let identity = state.gate.authenticate(session_id(&jar)).await?;
        Ok(Self(identity))
    }
}

/// An authenticated caller who currently holds the administrator role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for AdminIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) = CurrentIdentity::from_request_parts(parts, state).await?;
        state.gate.authorize_admin(&identity).await?;
        Ok(Self(identity))
    }
}
