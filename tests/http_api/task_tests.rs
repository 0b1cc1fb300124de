//! Task endpoints.

use super::helpers::{ADMIN, TestApp};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rstest::rstest;
use serde_json::{Value, json};

/// An app with an administrator and one worker, both logged in.
struct Board {
    app: TestApp,
    admin: String,
    worker: String,
    worker_id: i64,
}

/// Builds a [`Board`] with worker `ana`.
async fn board() -> eyre::Result<Board> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let worker_id = app.create_user(&admin, "ana", "trabajador").await?;
    let worker = app.login("ana").await?;
    Ok(Board {
        app,
        admin,
        worker,
        worker_id,
    })
}

/// Returns the titles of a task-list body, in order.
fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .map(|tasks| tasks.iter().filter_map(|task| task["title"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test(flavor = "multi_thread")]
async fn create_applies_defaults_and_records_creator() -> eyre::Result<()> {
    let board = board().await?;

    let created = board
        .app
        .send(
            Method::POST,
            "/api/tasks",
            Some(&board.worker),
            Some(json!({ "title": "Paint fence" })),
        )
        .await?;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Paint fence");
    assert_eq!(created.body["status"], "activo");
    assert_eq!(created.body["priority"], "media");
    assert_eq!(created.body["progress_state"], "inicializado");
    assert_eq!(created.body["created_by"], board.worker_id);
    assert_eq!(created.body["creator_name"], "ana");
    assert_eq!(created.body["assigned_to"], Value::Null);
    assert_eq!(created.body["updates"], json!([]));
    Ok(())
}

#[rstest]
#[case::missing_title(json!({ "description": "no title" }))]
#[case::blank_title(json!({ "title": "   " }))]
#[case::unknown_priority(json!({ "title": "t", "priority": "urgente" }))]
#[case::unknown_assignee(json!({ "title": "t", "assigned_to": 999 }))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_task_bodies_are_rejected(#[case] body: Value) -> eyre::Result<()> {
    let board = board().await?;

    let response = board
        .app
        .send(Method::POST, "/api/tasks", Some(&board.worker), Some(body))
        .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_requests_get_json_errors() -> eyre::Result<()> {
    let board = board().await?;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header(header::COOKIE, board.worker.as_str())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;

    let malformed = board.app.send_raw(request).await?;
    let bad_id = board
        .app
        .send(Method::GET, "/api/tasks/abc", Some(&board.worker), None)
        .await?;
    let anonymous = board.app.send(Method::GET, "/api/tasks", None, None).await?;

    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert!(malformed.error().is_some());
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_assignee_status_and_priority() -> eyre::Result<()> {
    let board = board().await?;
    let app = &board.app;
    app.create_task(&board.admin, json!({ "title": "Unassigned" }))
        .await?;
    app.create_task(
        &board.admin,
        json!({ "title": "Ana high", "assigned_to": board.worker_id, "priority": "alta" }),
    )
    .await?;
    let parked = app
        .create_task(&board.admin, json!({ "title": "Parked" }))
        .await?;
    app.send(
        Method::PATCH,
        &format!("/api/tasks/{parked}/status"),
        Some(&board.admin),
        Some(json!({ "status": "inactivo" })),
    )
    .await?;

    let all = app.send(Method::GET, "/api/tasks", Some(&board.worker), None).await?;
    let unassigned = app
        .send(Method::GET, "/api/tasks?assigned_to=null", Some(&board.worker), None)
        .await?;
    let mine = app
        .send(
            Method::GET,
            &format!("/api/tasks?assigned_to={}", board.worker_id),
            Some(&board.worker),
            None,
        )
        .await?;
    let inactive = app
        .send(Method::GET, "/api/tasks?status=inactivo", Some(&board.worker), None)
        .await?;
    let high = app
        .send(Method::GET, "/api/tasks?priority=alta", Some(&board.worker), None)
        .await?;
    let invalid = app
        .send(Method::GET, "/api/tasks?status=cerrado", Some(&board.worker), None)
        .await?;

    assert_eq!(titles(&all.body), vec!["Parked", "Ana high", "Unassigned"]);
    assert_eq!(titles(&unassigned.body), vec!["Parked", "Unassigned"]);
    assert_eq!(titles(&mine.body), vec!["Ana high"]);
    assert_eq!(titles(&inactive.body), vec!["Parked"]);
    assert_eq!(titles(&high.body), vec!["Ana high"]);
    assert_eq!(mine.body[0]["assigned_name"], "ana");
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_filters_are_ignored() -> eyre::Result<()> {
    let board = board().await?;
    let app = &board.app;
    app.create_task(&board.admin, json!({ "title": "First" }))
        .await?;
    app.create_task(
        &board.admin,
        json!({ "title": "Second", "assigned_to": board.worker_id }),
    )
    .await?;

    let blank = app
        .send(
            Method::GET,
            "/api/tasks?status=&assigned_to=&priority=&progress_state=%20",
            Some(&board.worker),
            None,
        )
        .await?;

    assert_eq!(blank.status, StatusCode::OK);
    assert_eq!(titles(&blank.body), vec!["Second", "First"]);
    Ok(())
}

#[rstest]
#[case::upper_case_filter(Method::GET, "/api/tasks?priority=ALTA", None)]
#[case::padded_filter(Method::GET, "/api/tasks?status=%20activo%20", None)]
#[case::upper_case_priority(
    Method::POST,
    "/api/tasks",
    Some(json!({ "title": "Loud", "priority": "ALTA" }))
)]
#[tokio::test(flavor = "multi_thread")]
async fn vocabulary_tokens_must_match_exactly(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) -> eyre::Result<()> {
    let board = board().await?;

    let response = board.app.send(method, uri, Some(&board.worker), body).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[case::create(Method::POST, "/api/tasks", Some(json!({ "title": "Sneaky" })))]
#[case::update(Method::PUT, "/api/tasks/1", Some(json!({ "title": "Sneaky" })))]
#[case::add_update(Method::POST, "/api/tasks/1/updates", Some(json!({ "comment": "hi" })))]
#[case::assign(Method::POST, "/api/tasks/1/assign", Some(json!({ "assigned_to": null })))]
#[case::status(Method::PATCH, "/api/tasks/1/status", Some(json!({ "status": "activo" })))]
#[case::delete(Method::DELETE, "/api/tasks/1", None)]
#[tokio::test(flavor = "multi_thread")]
async fn task_mutations_require_a_session(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) -> eyre::Result<()> {
    let board = board().await?;
    board
        .app
        .create_task(&board.admin, json!({ "title": "Guarded" }))
        .await?;

    let response = board.app.send(method, uri, None, body).await?;
    let after = board
        .app
        .send(Method::GET, "/api/tasks/1", Some(&board.admin), None)
        .await?;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), Some("Authentication required"));
    assert_eq!(after.body["title"], "Guarded");
    assert_eq!(after.body["updates"], json!([]));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_update_changes_only_named_fields() -> eyre::Result<()> {
    let board = board().await?;
    let id = board
        .app
        .create_task(
            &board.admin,
            json!({ "title": "Report", "description": "Q3", "due_date": "2026-12-01" }),
        )
        .await?;

    let updated = board
        .app
        .send(
            Method::PUT,
            &format!("/api/tasks/{id}"),
            Some(&board.worker),
            Some(json!({ "priority": "alta", "due_date": null })),
        )
        .await?;
    let empty = board
        .app
        .send(
            Method::PUT,
            &format!("/api/tasks/{id}"),
            Some(&board.worker),
            Some(json!({})),
        )
        .await?;
    let missing = board
        .app
        .send(
            Method::PUT,
            "/api/tasks/999",
            Some(&board.worker),
            Some(json!({ "title": "x" })),
        )
        .await?;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["priority"], "alta");
    assert_eq!(updated.body["description"], "Q3");
    assert_eq!(updated.body["title"], "Report");
    assert_eq!(updated.body["due_date"], Value::Null);
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), Some("Task not found"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn progress_updates_sync_task_state() -> eyre::Result<()> {
    let board = board().await?;
    let id = board
        .app
        .create_task(&board.admin, json!({ "title": "Report", "assigned_to": board.worker_id }))
        .await?;
    let uri = format!("/api/tasks/{id}/updates");

    let comment_only = board
        .app
        .send(Method::POST, &uri, Some(&board.worker), Some(json!({ "comment": "Started" })))
        .await?;
    let with_state = board
        .app
        .send(
            Method::POST,
            &uri,
            Some(&board.worker),
            Some(json!({ "comment": "Halfway", "progress_state": "en proceso" })),
        )
        .await?;
    let empty = board
        .app
        .send(Method::POST, &uri, Some(&board.worker), Some(json!({})))
        .await?;
    let missing = board
        .app
        .send(
            Method::POST,
            "/api/tasks/999/updates",
            Some(&board.worker),
            Some(json!({ "comment": "x" })),
        )
        .await?;
    let detail = board
        .app
        .send(Method::GET, &format!("/api/tasks/{id}"), Some(&board.worker), None)
        .await?;

    assert_eq!(comment_only.status, StatusCode::CREATED);
    assert_eq!(comment_only.body["progress_state"], "inicializado");
    assert_eq!(comment_only.body["user_name"], "ana");
    assert_eq!(with_state.status, StatusCode::CREATED);
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(detail.body["progress_state"], "en proceso");
    let comments: Vec<&str> = detail.body["updates"]
        .as_array()
        .ok_or_else(|| eyre::eyre!("expected updates array"))?
        .iter()
        .filter_map(|update| update["comment"].as_str())
        .collect();
    assert_eq!(comments, vec!["Halfway", "Started"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn assign_and_status_endpoints_validate_input() -> eyre::Result<()> {
    let board = board().await?;
    let id = board
        .app
        .create_task(&board.admin, json!({ "title": "Report" }))
        .await?;

    let assigned = board
        .app
        .send(
            Method::POST,
            &format!("/api/tasks/{id}/assign"),
            Some(&board.admin),
            Some(json!({ "assigned_to": board.worker_id })),
        )
        .await?;
    let ghost = board
        .app
        .send(
            Method::POST,
            &format!("/api/tasks/{id}/assign"),
            Some(&board.admin),
            Some(json!({ "assigned_to": 999 })),
        )
        .await?;
    let bad_status = board
        .app
        .send(
            Method::PATCH,
            &format!("/api/tasks/{id}/status"),
            Some(&board.worker),
            Some(json!({ "status": "cerrado" })),
        )
        .await?;
    let finished = board
        .app
        .send(
            Method::PATCH,
            &format!("/api/tasks/{id}/status"),
            Some(&board.worker),
            Some(json!({ "status": "finalizado" })),
        )
        .await?;

    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["assigned_to"], board.worker_id);
    assert_eq!(assigned.body["assigned_name"], "ana");
    assert_eq!(ghost.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(finished.status, StatusCode::OK);
    assert_eq!(finished.body["status"], "finalizado");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn only_administrators_delete_tasks() -> eyre::Result<()> {
    let board = board().await?;
    let id = board
        .app
        .create_task(&board.worker, json!({ "title": "Scratch" }))
        .await?;
    board
        .app
        .send(
            Method::POST,
            &format!("/api/tasks/{id}/updates"),
            Some(&board.worker),
            Some(json!({ "comment": "note" })),
        )
        .await?;
    let uri = format!("/api/tasks/{id}");

    let by_worker = board.app.send(Method::DELETE, &uri, Some(&board.worker), None).await?;
    let by_admin = board.app.send(Method::DELETE, &uri, Some(&board.admin), None).await?;
    let after = board.app.send(Method::GET, &uri, Some(&board.admin), None).await?;
    let again = board.app.send(Method::DELETE, &uri, Some(&board.admin), None).await?;

    assert_eq!(by_worker.status, StatusCode::FORBIDDEN);
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["message"], "Task deleted successfully");
    assert_eq!(after.status, StatusCode::NOT_FOUND);
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_count_by_status_and_assignment() -> eyre::Result<()> {
    let board = board().await?;
    board
        .app
        .create_task(&board.admin, json!({ "title": "a", "assigned_to": board.worker_id }))
        .await?;
    board.app.create_task(&board.admin, json!({ "title": "b" })).await?;
    let done = board.app.create_task(&board.admin, json!({ "title": "c" })).await?;
    board
        .app
        .send(
            Method::PATCH,
            &format!("/api/tasks/{done}/status"),
            Some(&board.admin),
            Some(json!({ "status": "finalizado" })),
        )
        .await?;

    let stats = board
        .app
        .send(Method::GET, "/api/tasks/stats/overview", Some(&board.worker), None)
        .await?;

    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(
        stats.body,
        json!({ "total": 3, "active": 2, "inactive": 0, "completed": 1, "unassigned": 2 })
    );
    Ok(())
}
