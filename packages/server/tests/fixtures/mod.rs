//! Test fixtures for integration tests.
//!
//! Starts the server in-process on an ephemeral port and provides a small
//! WebSocket client for driving it.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use mafia_server::{domain::GameConfig, ui, ui::state::AppState};
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// How long a test waits for an expected event.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server that shuts down when dropped
pub struct TestServer {
    addr: std::net::SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(GameConfig::default()).await
    }

    pub async fn start_with(config: GameConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (shutdown, signal) = oneshot::channel::<()>();
        let state = AppState::new(config);
        tokio::spawn(async move {
            let _ = ui::serve(listener, state, async {
                let _ = signal.await;
            })
            .await;
        });
        Self {
            addr,
            shutdown: Some(shutdown),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// WebSocket test client that speaks the JSON protocol.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl WsClient {
    /// Connect and consume the welcome event.
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };
        let welcome = client.recv_type("welcome").await;
        client.connection_id = welcome["data"]["connectionId"]
            .as_str()
            .expect("welcome without connectionId")
            .to_string();
        client
    }

    pub async fn send(&mut self, frame: Value) {
        self.send_text(frame.to_string()).await;
    }

    pub async fn send_text(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next event of any type.
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for an event")
                .expect("Stream closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
        }
    }

    /// Skip events until one matches `pred`.
    pub async fn recv_until(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        loop {
            let event = self.recv().await;
            if pred(&event) {
                return event;
            }
        }
    }

    pub async fn recv_type(&mut self, kind: &str) -> Value {
        self.recv_until(|e| e["type"] == kind).await
    }

    pub async fn recv_phase(&mut self, phase: &str) -> Value {
        self.recv_until(|e| e["type"] == "phase-changed" && e["data"]["phase"] == phase)
            .await
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

pub fn player(id: &str, name: &str) -> Value {
    serde_json::json!({ "id": id, "name": name })
}
