//! Login, logout, and session status.

use super::helpers::{ADMIN, TestApp};
use axum::http::{Method, StatusCode, header};
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn login_sets_http_only_session_cookie() -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let response = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({ "name": ADMIN })))
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["user"]["name"], ADMIN);
    assert_eq!(response.body["user"]["role"], "admin");
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| eyre::eyre!("missing set-cookie header"))?;
    assert!(cookie.starts_with("taskboard_sid="));
    assert!(cookie.contains("HttpOnly"));
    assert!(
        cookie.contains("Max-Age=86400"),
        "cookie should expire with the 24h session: {cookie}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn logging_in_again_retires_the_old_session() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let first = app.login(ADMIN).await?;

    let relogin = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(&first),
            Some(json!({ "name": ADMIN })),
        )
        .await?;
    let second = relogin
        .session_cookie()
        .ok_or_else(|| eyre::eyre!("login did not set a session cookie"))?;
    let old = app.send(Method::GET, "/api/auth/me", Some(&first), None).await?;
    let new = app.send(Method::GET, "/api/auth/me", Some(&second), None).await?;

    assert_ne!(first, second);
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    assert_eq!(new.status, StatusCode::OK);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn login_trims_and_matches_existing_names_only() -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let unknown = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({ "name": "nobody" })))
        .await?;
    let missing = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({})))
        .await?;
    let blank = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({ "name": "   " })))
        .await?;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.error(), Some("Invalid credentials"));
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error(), Some("Name is required"));
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn status_reflects_session_lifecycle() -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let anonymous = app.send(Method::GET, "/api/auth/status", None, None).await?;
    assert_eq!(anonymous.body, json!({ "authenticated": false }));

    let cookie = app.login(ADMIN).await?;
    let signed_in = app
        .send(Method::GET, "/api/auth/status", Some(&cookie), None)
        .await?;
    assert_eq!(signed_in.body["authenticated"], true);
    assert_eq!(signed_in.body["user"]["name"], ADMIN);

    let logout = app
        .send(Method::POST, "/api/auth/logout", Some(&cookie), None)
        .await?;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["message"], "Logout successful");

    let after = app
        .send(Method::GET, "/api/auth/status", Some(&cookie), None)
        .await?;
    assert_eq!(after.body["authenticated"], false);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn me_requires_a_session() -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let anonymous = app.send(Method::GET, "/api/auth/me", None, None).await?;
    let forged = app
        .send(Method::GET, "/api/auth/me", Some("taskboard_sid=not-a-session"), None)
        .await?;
    let cookie = app.login(ADMIN).await?;
    let me = app.send(Method::GET, "/api/auth/me", Some(&cookie), None).await?;

    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.error(), Some("Authentication required"));
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["role"], "admin");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn health_needs_no_session() -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let response = app.send(Method::GET, "/api/health", None, None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert!(response.body["timestamp"].is_string());
    Ok(())
}
