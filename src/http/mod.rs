//! HTTP and WebSocket edge.
//!
//! Handlers translate between JSON bodies and the application services,
//! authenticate callers through the session cookie, and publish realtime
//! events after successful task writes. All routes except the health check
//! and the socket live under `/api`.

pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod state;
pub mod tasks;
pub mod users;
pub mod ws;

pub use error::ApiError;
pub use state::{AppState, Repositories};

use axum::Router;
use axum::routing::{get, patch, post, put};

/// Builds the application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/status", get(auth::status))
        .route("/me", get(auth::me));

    let users = Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/me", get(users::me))
        .route("/role/{role}", get(users::list_by_role))
        .route("/{id}", put(users::update).delete(users::delete));

    let tasks = Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route("/stats/overview", get(tasks::stats))
        .route(
            "/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/{id}/updates", post(tasks::add_update))
        .route("/{id}/assign", post(tasks::assign))
        .route("/{id}/status", patch(tasks::change_status));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/users", users)
        .nest("/tasks", tasks)
        .route("/health", get(health::health));

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::upgrade))
        .with_state(state)
}
