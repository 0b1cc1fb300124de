//! Shared helpers for driving the router in tests.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use eyre::WrapErr;
use serde_json::Value;
use taskboard::http::{AppState, Repositories, router};
use tower::ServiceExt;

/// Name of the administrator seeded into every test app.
pub const ADMIN: &str = "admin";

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers, including any `Set-Cookie`.
    pub headers: HeaderMap,
    /// Decoded JSON body, `Null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// Returns the `error` message of an error body.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// Returns the session cookie pair set by the response.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("taskboard_sid="))
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    }
}

/// An application over fresh in-memory storage with a seeded administrator.
pub struct TestApp {
    /// Shared state, exposed for hub subscriptions.
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Builds the app and seeds the default administrator.
    pub async fn new() -> eyre::Result<Self> {
        let state = AppState::new(Repositories::in_memory(), chrono::Duration::hours(24), 64);
        state
            .directory
            .ensure_default_admin(ADMIN)
            .await
            .wrap_err("seed administrator")?;
        let router = router(state.clone());
        Ok(Self { state, router })
    }

    /// Sends a request, optionally authenticated and with a JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> eyre::Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(pair) = cookie {
            builder = builder.header(header::COOKIE, pair);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send_raw(request).await
    }

    /// Sends a prepared request.
    pub async fn send_raw(&self, request: Request<Body>) -> eyre::Result<TestResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .wrap_err("router call")?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).wrap_err("response body is not JSON")?
        };
        Ok(TestResponse {
            status,
            headers,
            body,
        })
    }

    /// Logs in as `name` and returns the cookie pair to send back.
    pub async fn login(&self, name: &str) -> eyre::Result<String> {
        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "name": name })),
            )
            .await?;
        if response.status != StatusCode::OK {
            return Err(eyre::eyre!("login as {name} failed: {:?}", response.body));
        }
        response
            .session_cookie()
            .ok_or_else(|| eyre::eyre!("login did not set a session cookie"))
    }

    /// Creates a user through the API as the administrator; returns its id.
    pub async fn create_user(&self, admin: &str, name: &str, role: &str) -> eyre::Result<i64> {
        let response = self
            .send(
                Method::POST,
                "/api/users",
                Some(admin),
                Some(serde_json::json!({ "name": name, "role": role })),
            )
            .await?;
        if response.status != StatusCode::CREATED {
            return Err(eyre::eyre!("create user {name} failed: {:?}", response.body));
        }
        id_of(&response.body)
    }

    /// Creates a task through the API; returns its id.
    pub async fn create_task(&self, cookie: &str, body: Value) -> eyre::Result<i64> {
        let response = self
            .send(Method::POST, "/api/tasks", Some(cookie), Some(body))
            .await?;
        if response.status != StatusCode::CREATED {
            return Err(eyre::eyre!("create task failed: {:?}", response.body));
        }
        id_of(&response.body)
    }
}

/// Extracts the numeric `id` field of a JSON object.
pub fn id_of(body: &Value) -> eyre::Result<i64> {
    body.get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| eyre::eyre!("body has no numeric id: {body}"))
}
