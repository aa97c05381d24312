//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::CodecError,
    ui::state::AppState,
    usecase::RoomCoordinator,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let coordinator = state.coordinator.clone();
    let connection_id = coordinator.connect(tx).await;

    // Spawn a task to receive frames from this client
    let recv_coordinator = coordinator.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::trace!("Received from '{}': {}", connection_id, text.as_str());
                    handle_text(&recv_coordinator, connection_id, text.as_str().to_string()).await;
                }
                Message::Binary(_) => {
                    recv_coordinator
                        .reject(connection_id, &CodecError::InvalidJson.into())
                        .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    coordinator.disconnect(connection_id).await;
}

/// Apply one frame on its own task so that aborting the connection's tasks
/// never interrupts a half-applied command.
async fn handle_text(coordinator: &Arc<RoomCoordinator>, connection_id: ConnectionId, text: String) {
    let coordinator = coordinator.clone();
    let result = tokio::spawn(async move { coordinator.handle_frame(connection_id, &text).await })
        .await;
    if let Err(e) = result {
        tracing::error!("Command task for '{}' failed: {}", connection_id, e);
    }
}
