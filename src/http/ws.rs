//! Realtime WebSocket endpoint.
//!
//! Frames in both directions are JSON objects of the form
//! `{"event": "<name>", "data": <payload>}`.

use super::state::AppState;
use crate::realtime::{BroadcastHub, ClientEvent};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, warn};

/// `GET /ws`
pub async fn upgrade(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| serve(socket, state.hub))
}

async fn serve(mut socket: WebSocket, hub: BroadcastHub) {
    let mut subscription = hub.subscribe();
    let connection = subscription.connection();
    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => hub.handle(connection, event),
                            Err(err) => debug!(%connection, error = %err, "ignoring malformed realtime frame"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        debug!(%connection, error = %err, "realtime socket error");
                        break;
                    }
                }
            }
            outgoing = subscription.recv() => {
                let Some(event) = outgoing else { break };
                let frame = match serde_json::to_string(event.as_ref()) {
                    Ok(frame) => frame,
                    Err(err) => {
                        warn!(%connection, error = %err, "failed to encode realtime event");
                        continue;
                    }
                };
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
        }
    }
}
