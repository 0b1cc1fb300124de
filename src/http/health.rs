//! Liveness check.

use super::extract::Json;
use super::state::AppState;
use axum::extract::State;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

/// `GET /api/health`
#[expect(clippy::unused_async, reason = "axum handlers are futures")]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: state.clock.utc(),
    })
}
