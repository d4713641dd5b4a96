//! WebSocket live channel for game messages.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws?token=<session token>`
//! 2. Server resolves the session and registers the user's channel in the
//!    connection registry, replacing any older one
//! 3. A send task forwards every game message addressed to the user as a JSON
//!    text frame `{"messageType": ..., "message": ...}`
//! 4. On disconnect the channel is pruned, unless a newer connection for the
//!    same user has replaced it
//!
//! Games are played over the HTTP API; inbound frames are logged and ignored.
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8080/ws?token=...');
//! ws.onmessage = (event) => {
//!   const { messageType, message } = JSON.parse(event.data);
//! };
//! ```

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use liars_dice::UserId;
use log::{debug, info, warn};
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: String,
}

/// Upgrade to a WebSocket for the session identified by `token`.
///
/// Returns `401 Unauthorized` for an unknown token.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let Some(user_id) = state.sessions.user_for(&query.token) else {
        return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

async fn handle_socket(socket: WebSocket, user_id: UserId, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut outbound = state.connections.register(&user_id);
    info!("WebSocket connected: user={}", user_id);

    let send_user = user_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                debug!("WebSocket send failed for user {}", send_user);
                break;
            }
        }
        // Registry dropped us (logout or a newer connection)
        let _ = sender.send(Message::Close(None)).await;
    });

    let send_finished = loop {
        tokio::select! {
            _ = &mut send_task => break true,
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    debug!("Ignoring inbound frame from user {}: {}", user_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break false,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket error for user {}: {}", user_id, e);
                    break false;
                }
            },
        }
    };

    if !send_finished {
        send_task.abort();
        // Wait for the task so its receiver is dropped before pruning
        let _ = send_task.await;
    }
    state.connections.prune(&user_id);
    info!("WebSocket disconnected: user={}", user_id);
}
