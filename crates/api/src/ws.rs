use std::ops::ControlFlow;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::state::{AppState, FeedEvent, SnapshotBody};

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Full-state reply to a client text frame, for resyncing after a reconnect
/// without a separate HTTP round trip.
#[derive(Debug, Serialize)]
struct SnapshotMessage {
    event_type: &'static str,
    state: SnapshotBody,
}

async fn stream_events(mut socket: WebSocket, state: AppState) {
    if send_json(&mut socket, &FeedEvent::Connected).await.is_break() {
        return;
    }

    let mut events = state.subscribe_events();
    loop {
        let flow = tokio::select! {
            inbound = socket.recv() => on_client_frame(&mut socket, &state, inbound).await,
            event = events.recv() => on_feed_event(&mut socket, event).await,
        };
        if flow.is_break() {
            return;
        }
    }
}

async fn on_client_frame(
    socket: &mut WebSocket,
    state: &AppState,
    inbound: Option<Result<Message, axum::Error>>,
) -> ControlFlow<()> {
    match inbound {
        // any text frame is a snapshot request
        Some(Ok(Message::Text(_))) => {
            let snapshot: SnapshotBody = state.session().lock().await.snapshot().into();
            send_json(
                socket,
                &SnapshotMessage {
                    event_type: "snapshot",
                    state: snapshot,
                },
            )
            .await
        }
        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => ControlFlow::Break(()),
        Some(Ok(_)) => ControlFlow::Continue(()),
    }
}

async fn on_feed_event(
    socket: &mut WebSocket,
    event: Result<FeedEvent, RecvError>,
) -> ControlFlow<()> {
    match event {
        Ok(event) => send_json(socket, &event).await,
        Err(RecvError::Lagged(_)) => ControlFlow::Continue(()),
        Err(RecvError::Closed) => ControlFlow::Break(()),
    }
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, payload: &T) -> ControlFlow<()> {
    let Ok(json) = serde_json::to_string(payload) else {
        return ControlFlow::Break(());
    };
    if socket.send(Message::Text(json)).await.is_err() {
        return ControlFlow::Break(());
    }
    ControlFlow::Continue(())
}
