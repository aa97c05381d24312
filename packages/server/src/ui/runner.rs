//! Server bootstrap: router, listener, and graceful shutdown.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    ui::{
        handler::{get_room_detail, get_rooms, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{code}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves, then stop
/// every phase timer.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let coordinator = state.coordinator.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    coordinator.shutdown().await;
    Ok(())
}

/// Run the server with `config` until Ctrl+C or SIGTERM.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(config.game_config());
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!("WebSocket endpoint: ws://{}/ws", listener.local_addr()?);
    serve(listener, state, shutdown_signal()).await
}
