//! Connection registry.
//!
//! Tracks every live WebSocket connection, its outbound channel, and the
//! room/player it is bound to. A connection is bound to at most one player
//! in one room at a time.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};

use crate::domain::{ConnectionId, PlayerId, RoomCode, Timestamp};

/// Outbound channel to a single client. Frames are already encoded JSON.
pub type ClientSender = mpsc::UnboundedSender<String>;

/// The room and player a connection acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room_code: RoomCode,
    pub player_id: PlayerId,
}

/// Client connection information
struct ConnectionInfo {
    sender: ClientSender,
    /// Unix timestamp when connected (in JST, milliseconds)
    connected_at: Timestamp,
    binding: Option<Binding>,
}

/// A recipient of a room-scoped delivery.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub connection_id: ConnectionId,
    pub player_id: PlayerId,
    pub sender: ClientSender,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionInfo>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, unbound connection.
    pub async fn register(&self, sender: ClientSender, connected_at: Timestamp) -> ConnectionId {
        let id = ConnectionId::generate();
        let mut connections = self.connections.write().await;
        connections.insert(
            id,
            ConnectionInfo {
                sender,
                connected_at,
                binding: None,
            },
        );
        id
    }

    /// Forget a connection. Returns its binding, if it had one.
    pub async fn unregister(&self, id: ConnectionId) -> Option<Binding> {
        let mut connections = self.connections.write().await;
        connections.remove(&id).and_then(|info| info.binding)
    }

    /// Bind a connection to a player. Returns `false` when the connection
    /// has already been unregistered.
    pub async fn bind(&self, id: ConnectionId, room_code: RoomCode, player_id: PlayerId) -> bool {
        let mut connections = self.connections.write().await;
        let Some(info) = connections.get_mut(&id) else {
            return false;
        };
        info.binding = Some(Binding {
            room_code,
            player_id,
        });
        true
    }

    /// Whether any live connection acts for `player_id` in `room_code`.
    pub async fn is_bound(&self, room_code: &RoomCode, player_id: &PlayerId) -> bool {
        let connections = self.connections.read().await;
        connections.values().any(|info| {
            info.binding
                .as_ref()
                .is_some_and(|b| &b.room_code == room_code && &b.player_id == player_id)
        })
    }

    /// Clear the binding of whichever connection acts for `player_id` in
    /// `room_code`.
    pub async fn unbind_player(&self, room_code: &RoomCode, player_id: &PlayerId) {
        let mut connections = self.connections.write().await;
        for info in connections.values_mut() {
            if info
                .binding
                .as_ref()
                .is_some_and(|b| &b.room_code == room_code && &b.player_id == player_id)
            {
                info.binding = None;
            }
        }
    }

    pub async fn binding(&self, id: ConnectionId) -> Option<Binding> {
        let connections = self.connections.read().await;
        connections.get(&id).and_then(|info| info.binding.clone())
    }

    pub async fn connected_at(&self, id: ConnectionId) -> Option<Timestamp> {
        let connections = self.connections.read().await;
        connections.get(&id).map(|info| info.connected_at)
    }

    pub async fn sender(&self, id: ConnectionId) -> Option<ClientSender> {
        let connections = self.connections.read().await;
        connections.get(&id).map(|info| info.sender.clone())
    }

    /// Every connection currently bound to `room_code`.
    pub async fn recipients(&self, room_code: &RoomCode) -> Vec<Recipient> {
        let connections = self.connections.read().await;
        connections
            .iter()
            .filter_map(|(id, info)| {
                let binding = info.binding.as_ref()?;
                (&binding.room_code == room_code).then(|| Recipient {
                    connection_id: *id,
                    player_id: binding.player_id.clone(),
                    sender: info.sender.clone(),
                })
            })
            .collect()
    }

    pub async fn count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}
