//! Event delivery to the connections bound to a room.
//!
//! Delivery is best effort: a connection whose channel is closed is skipped
//! and never fails the command that produced the event.

use std::sync::Arc;

use crate::{
    domain::{Audience, ConnectionId, Outgoing, PlayerId, Room, RoomCode},
    infrastructure::{
        connection::registry::ConnectionRegistry,
        dto::websocket::{ServerEvent, encode},
    },
};

pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send `event` to every connection bound to `room_code`.
    pub async fn broadcast(&self, room_code: &RoomCode, event: &ServerEvent) -> usize {
        self.send_to_subset(room_code, event, |_| true).await
    }

    /// Send `event` to the connections bound to `room_code` whose player
    /// satisfies `predicate`. Returns the number of successful sends.
    pub async fn send_to_subset(
        &self,
        room_code: &RoomCode,
        event: &ServerEvent,
        predicate: impl Fn(&PlayerId) -> bool,
    ) -> usize {
        let Some(json) = encode_or_log(event) else {
            return 0;
        };
        let mut delivered = 0;
        for recipient in self.registry.recipients(room_code).await {
            if !predicate(&recipient.player_id) {
                continue;
            }
            if recipient.sender.send(json.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(
                    "Skipping closed connection '{}' in room {}",
                    recipient.connection_id,
                    room_code
                );
            }
        }
        delivered
    }

    /// Send `event` to a single connection, bound or not.
    pub async fn send_to_connection(&self, id: ConnectionId, event: &ServerEvent) -> bool {
        let Some(json) = encode_or_log(event) else {
            return false;
        };
        match self.registry.sender(id).await {
            Some(sender) => sender.send(json).is_ok(),
            None => false,
        }
    }

    /// Deliver domain events in order, each to its audience.
    pub async fn deliver(&self, room: &Room, outgoing: Vec<Outgoing>) {
        for Outgoing { audience, event } in outgoing {
            let event = ServerEvent::from(event);
            match audience {
                Audience::Room => {
                    self.broadcast(&room.code, &event).await;
                }
                Audience::Player(target) => {
                    self.send_to_subset(&room.code, &event, |p| p == &target)
                        .await;
                }
                Audience::Mafia => {
                    let mafia = room.mafia_ids();
                    self.send_to_subset(&room.code, &event, |p| mafia.contains(p))
                        .await;
                }
            }
        }
    }
}

fn encode_or_log(event: &ServerEvent) -> Option<String> {
    match encode(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to encode event: {}", e);
            None
        }
    }
}
