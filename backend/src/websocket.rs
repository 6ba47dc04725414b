//! WebSocket handlers for real-time updates
//!
//! This module streams studio project snapshots to connected clients.
//! Supports ping/pong for connection keepalive.

use crate::state::AppState;
use crate::studio::{Project, StudioUpdate};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// WebSocket message types for real-time communication
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum WebSocketMessage {
    /// Project state at connection time
    #[serde(rename = "initial_state")]
    InitialState {
        /// Current project
        project: Project,
    },
    /// Ping message for connection keepalive
    #[serde(rename = "ping")]
    Ping,
    /// Pong message responding to ping
    #[serde(rename = "pong")]
    Pong,
}

/// WebSocket upgrade handler
///
/// Sends the current project on connect, then every [`StudioUpdate`].
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RwLock<AppState>>>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn encode<T: Serialize>(message: &T) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            error!("Failed to encode WebSocket message: {}", e);
            None
        }
    }
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<RwLock<AppState>>) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket client connected");

    let studio = Arc::clone(&state.read().await.studio);
    // Subscribe before taking the snapshot so no update falls in between
    let mut updates = studio.subscribe();
    let initial_state = WebSocketMessage::InitialState {
        project: studio.snapshot().await,
    };

    let Some(initial_message) = encode(&initial_state) else {
        return;
    };
    if let Err(e) = sender.send(initial_message).await {
        error!("Failed to send initial state: {}", e);
        return;
    }

    // Use a channel to send messages from all tasks to the sender
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Message>();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(msg).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    // Forward studio updates
    let update_tx = tx.clone();
    let mut update_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let Some(msg) = encode::<StudioUpdate>(&update) else {
                        continue;
                    };
                    if update_tx.send(msg).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket client lagged behind studio updates");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Task to send periodic pings
    let ping_tx = tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
            if ping_tx.send(Message::Ping(vec![])).is_err() {
                break;
            }
        }
    });

    // Receive messages
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<WebSocketMessage>(&text) {
                        Ok(WebSocketMessage::Ping) => {
                            if let Some(pong) = encode(&WebSocketMessage::Pong) {
                                if tx.send(pong).is_err() {
                                    break;
                                }
                            }
                        }
                        Ok(other) => warn!("Received unhandled WebSocket message: {:?}", other),
                        Err(_) => warn!("Ignoring malformed WebSocket message"),
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected");
                    break;
                }
                Ok(Message::Pong(_)) => {}
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut send_task => {}
        _ = &mut update_task => {}
        _ = &mut ping_task => {}
        _ = &mut recv_task => {}
    }
    send_task.abort();
    update_task.abort();
    ping_task.abort();
    recv_task.abort();

    info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_pong_wire_format() {
        let ping: WebSocketMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(ping, WebSocketMessage::Ping));
        assert_eq!(
            serde_json::to_string(&WebSocketMessage::Pong).unwrap(),
            r#"{"type":"pong"}"#
        );
    }

    #[test]
    fn test_initial_state_carries_project() {
        let message = WebSocketMessage::InitialState {
            project: Project::new("Solar Lantern"),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "initial_state");
        assert_eq!(json["project"]["productName"], "Solar Lantern");
        assert_eq!(json["project"]["status"], "IDLE");
    }
}
