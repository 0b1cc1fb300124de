//! Events published by HTTP writes, observed through hub subscriptions.

use super::helpers::{ADMIN, TestApp, id_of};
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use taskboard::identity::domain::{Role, UserId};
use taskboard::realtime::{ClientEvent, PresenceUser, Subscription};
use taskboard::task::domain::TaskId;

/// Serializes every event already queued on `subscription`.
fn drain(subscription: &mut Subscription) -> eyre::Result<Vec<Value>> {
    let mut frames = Vec::new();
    while let Some(event) = subscription.try_recv() {
        frames.push(serde_json::to_value(event.as_ref())?);
    }
    Ok(frames)
}

/// Returns the `event` names of `frames`, in order.
fn event_names(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .filter_map(|frame| frame["event"].as_str())
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn task_writes_are_broadcast_in_order() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let mut watcher = app.state.hub.subscribe();

    let created = app
        .send(Method::POST, "/api/tasks", Some(&admin), Some(json!({ "title": "Live" })))
        .await?;
    let id = id_of(&created.body)?;
    let updated = app
        .send(
            Method::PUT,
            &format!("/api/tasks/{id}"),
            Some(&admin),
            Some(json!({ "priority": "alta" })),
        )
        .await?;
    app.send(
        Method::POST,
        &format!("/api/tasks/{id}/updates"),
        Some(&admin),
        Some(json!({ "comment": "moving", "progress_state": "en proceso" })),
    )
    .await?;
    app.send(Method::DELETE, &format!("/api/tasks/{id}"), Some(&admin), None)
        .await?;

    let frames = drain(&mut watcher)?;
    assert_eq!(
        event_names(&frames),
        vec!["task:created", "task:updated", "task:update_added", "task:deleted"]
    );
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(frames[0]["data"], created.body);
    assert_eq!(frames[1]["data"], updated.body);
    assert_eq!(frames[2]["data"]["taskId"], id);
    assert_eq!(frames[2]["data"]["task"]["progress_state"], "en proceso");
    assert_eq!(frames[3]["data"], json!({ "id": id }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn assignment_and_status_events_name_the_actor() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let ana = app.create_user(&admin, "ana", "trabajador").await?;
    let id = app.create_task(&admin, json!({ "title": "Assign me" })).await?;
    let mut watcher = app.state.hub.subscribe();

    app.send(
        Method::POST,
        &format!("/api/tasks/{id}/assign"),
        Some(&admin),
        Some(json!({ "assigned_to": ana })),
    )
    .await?;
    app.send(
        Method::PATCH,
        &format!("/api/tasks/{id}/status"),
        Some(&admin),
        Some(json!({ "status": "inactivo" })),
    )
    .await?;

    let frames = drain(&mut watcher)?;
    assert_eq!(
        event_names(&frames),
        vec!["task:assigned", "task:status_changed"]
    );
    assert_eq!(frames[0]["data"]["assignedTo"], ana);
    assert_eq!(frames[0]["data"]["assignedByName"], ADMIN);
    assert_eq!(frames[0]["data"]["task"]["assigned_name"], "ana");
    assert_eq!(frames[1]["data"]["status"], "inactivo");
    assert_eq!(frames[1]["data"]["changedByName"], ADMIN);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_writes_publish_nothing() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let admin = app.login(ADMIN).await?;
    let mut watcher = app.state.hub.subscribe();

    let response = app
        .send(
            Method::PATCH,
            "/api/tasks/42/status",
            Some(&admin),
            Some(json!({ "status": "activo" })),
        )
        .await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(drain(&mut watcher)?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn viewer_notices_reach_other_viewers_only() -> eyre::Result<()> {
    let app = TestApp::new().await?;
    let hub = &app.state.hub;
    let mut ana = hub.subscribe();
    let mut bob = hub.subscribe();
    let mut outsider = hub.subscribe();
    let task = TaskId::new(7);
    for (subscription, id, name) in [(&ana, 1, "ana"), (&bob, 2, "bob")] {
        hub.handle(
            subscription.connection(),
            ClientEvent::UserJoin(PresenceUser {
                id: UserId::new(id),
                name: name.to_owned(),
                role: Role::Worker,
            }),
        );
    }
    drain(&mut ana)?;
    drain(&mut bob)?;
    drain(&mut outsider)?;

    hub.handle(ana.connection(), ClientEvent::TaskViewing(task));
    hub.handle(bob.connection(), ClientEvent::TaskViewing(task));
    hub.handle(bob.connection(), ClientEvent::TaskStopViewing(task));

    let to_ana = drain(&mut ana)?;
    assert_eq!(
        event_names(&to_ana),
        vec!["task:viewer_joined", "task:viewer_left"]
    );
    assert_eq!(to_ana[0]["data"]["user"]["name"], "bob");
    assert!(drain(&mut bob)?.is_empty());
    assert!(drain(&mut outsider)?.is_empty());
    Ok(())
}
