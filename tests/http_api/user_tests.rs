//! User administration endpoints and role gates.

use super::helpers::{ADMIN, TestApp, id_of};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

#[tokio::test(flavor = "multi_thread")]
async fn only_administrators_list_all_users() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    app.create_user(&admin, "ana", "trabajador").await?;
    let worker = app.login("ana").await?;

    let as_worker = app.send(Method::GET, "/api/users", Some(&worker), None).await?;
    let as_admin = app.send(Method::GET, "/api/users", Some(&admin), None).await?;

    assert_eq!(as_worker.status, StatusCode::FORBIDDEN);
    assert_eq!(as_worker.error(), Some("Admin access required"));
    assert_eq!(as_admin.status, StatusCode::OK);
    let names: Vec<&str> = as_admin
        .body
        .as_array()
        .ok_or_else(|| eyre::eyre!("expected an array"))?
        .iter()
        .filter_map(|user| user["name"].as_str())
        .collect();
    assert_eq!(names, vec!["ana", ADMIN]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn demoted_administrator_loses_access_immediately() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let bea = app.create_user(&admin, "bea", "admin").await?;
    let bea_cookie = app.login("bea").await?;

    let demote = app
        .send(
            Method::PUT,
            &format!("/api/users/{bea}"),
            Some(&admin),
            Some(json!({ "name": "bea", "role": "trabajador" })),
        )
        .await?;
    let listing = app
        .send(Method::GET, "/api/users", Some(&bea_cookie), None)
        .await?;

    assert_eq!(demote.status, StatusCode::OK);
    assert_eq!(demote.body["role"], "trabajador");
    assert_eq!(listing.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_names_conflict() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    app.create_user(&admin, "ana", "trabajador").await?;

    let response = app
        .send(
            Method::POST,
            "/api/users",
            Some(&admin),
            Some(json!({ "name": "ana", "role": "admin" })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::CONFLICT);
    Ok(())
}

#[rstest]
#[case::missing_role(json!({ "name": "cruz" }))]
#[case::unknown_role(json!({ "name": "cruz", "role": "manager" }))]
#[case::blank_name(json!({ "name": " ", "role": "admin" }))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_user_bodies_are_rejected(#[case] body: Value) -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;

    let response = app
        .send(Method::POST, "/api/users", Some(&admin), Some(body))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn role_listing_validates_role() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    app.create_user(&admin, "ana", "trabajador").await?;
    let worker = app.login("ana").await?;

    let workers = app
        .send(Method::GET, "/api/users/role/trabajador", Some(&worker), None)
        .await?;
    let unknown = app
        .send(Method::GET, "/api/users/role/manager", Some(&worker), None)
        .await?;

    assert_eq!(workers.status, StatusCode::OK);
    assert_eq!(workers.body.as_array().map(Vec::len), Some(1));
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.error(), Some("Invalid role"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn users_me_returns_full_record() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;

    let response = app.send(Method::GET, "/api/users/me", Some(&admin), None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], ADMIN);
    assert!(response.body["created_at"].is_string());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_users_honours_guards() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let admin_id = id_of(&app.send(Method::GET, "/api/users/me", Some(&admin), None).await?.body)?;
    let ana = app.create_user(&admin, "ana", "trabajador").await?;
    let task = app
        .create_task(&admin, json!({ "title": "Audit", "assigned_to": ana }))
        .await?;

    let own = app
        .send(Method::DELETE, &format!("/api/users/{admin_id}"), Some(&admin), None)
        .await?;
    let busy = app
        .send(Method::DELETE, &format!("/api/users/{ana}"), Some(&admin), None)
        .await?;
    app.send(
        Method::POST,
        &format!("/api/tasks/{task}/assign"),
        Some(&admin),
        Some(json!({ "assigned_to": null })),
    )
    .await?;
    let freed = app
        .send(Method::DELETE, &format!("/api/users/{ana}"), Some(&admin), None)
        .await?;
    let gone = app
        .send(Method::DELETE, &format!("/api/users/{ana}"), Some(&admin), None)
        .await?;

    assert_eq!(own.status, StatusCode::BAD_REQUEST);
    assert_eq!(own.error(), Some("Cannot delete your own account"));
    assert_eq!(busy.status, StatusCode::BAD_REQUEST);
    assert_eq!(freed.status, StatusCode::OK);
    assert_eq!(freed.body["message"], "User deleted successfully");
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_creator_keeps_their_tasks() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let ana = app.create_user(&admin, "ana", "trabajador").await?;
    let worker = app.login("ana").await?;
    let task = app.create_task(&worker, json!({ "title": "Rake leaves" })).await?;
    let comment = app
        .send(
            Method::POST,
            &format!("/api/tasks/{task}/updates"),
            Some(&worker),
            Some(json!({ "comment": "half done" })),
        )
        .await?;
    assert_eq!(comment.status, StatusCode::CREATED);

    let deleted = app
        .send(Method::DELETE, &format!("/api/users/{ana}"), Some(&admin), None)
        .await?;
    let detail = app
        .send(Method::GET, &format!("/api/tasks/{task}"), Some(&admin), None)
        .await?;

    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["created_by"], Value::Null);
    assert_eq!(detail.body["creator_name"], Value::Null);
    assert_eq!(detail.body["updates"], json!([]));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn workers_cannot_delete_users() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    app.create_user(&admin, "ana", "trabajador").await?;
    let bob = app.create_user(&admin, "bob", "trabajador").await?;
    let worker = app.login("ana").await?;

    let response = app
        .send(Method::DELETE, &format!("/api/users/{bob}"), Some(&worker), None)
        .await?;
    let still_there = app.send(Method::GET, "/api/users", Some(&admin), None).await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error(), Some("Admin access required"));
    assert_eq!(
        still_there.body.as_array().map(Vec::len),
        Some(3),
        "no user should have been removed"
    );
    Ok(())
}

#[rstest]
#[case::create(Method::POST, "/api/users", Some(json!({ "name": "cruz", "role": "admin" })))]
#[case::update(Method::PUT, "/api/users/1", Some(json!({ "name": "cruz", "role": "admin" })))]
#[case::delete(Method::DELETE, "/api/users/1", None)]
#[tokio::test(flavor = "multi_thread")]
async fn user_mutations_require_a_session(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) -> eyre::Result<()> {
    let app = TestApp::new().await?;

    let response = app.send(method, uri, None, body).await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Authentication required"));
    Ok(())
}
