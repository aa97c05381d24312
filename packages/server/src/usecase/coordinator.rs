//! UseCase: ルームコーディネーター
//!
//! クライアントからのコマンドとフェーズタイマーの通知を受け取り、
//! 対象ルームのロックを取得した状態で検証・状態遷移・イベント配信を行います。
//!
//! ## 直列化
//!
//! 1 つのルームに対するコマンドは [`RoomHandle`] のロックで直列化されます。
//! 状態遷移によって発生したイベントは、ロックを保持したまま発生順に
//! 各接続のチャネルへ積まれるため、全員が同じ順序でイベントを受け取ります。
//! 異なるルームのコマンドは互いにブロックしません。

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use mafia_shared::time::get_jst_timestamp;
use tokio::sync::OwnedMutexGuard;

use crate::{
    domain::{
        ConnectionId, GameConfig, Outgoing, PlayerId, Room, RoomCode, RoomError, RoomHandle,
        RoomRepository, Timestamp,
    },
    infrastructure::{
        connection::{Broadcaster, ConnectionRegistry, registry::ClientSender},
        dto::websocket::{ClientCommand, ServerEvent, decode},
        timer::{PhaseTimer, TimerSink},
    },
};

use super::error::CoordinatorError;

pub const WELCOME_MESSAGE: &str = "Connected to Mafia game server";

/// Entry point for everything that mutates a room.
pub struct RoomCoordinator {
    this: Weak<RoomCoordinator>,
    pub(super) repository: Arc<dyn RoomRepository>,
    pub(super) registry: Arc<ConnectionRegistry>,
    pub(super) broadcaster: Broadcaster,
    timers: PhaseTimer,
    pub(super) config: GameConfig,
}

impl RoomCoordinator {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<ConnectionRegistry>,
        config: GameConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            repository,
            broadcaster: Broadcaster::new(registry.clone()),
            registry,
            timers: PhaseTimer::new(),
            config,
        })
    }

    /// Register a new connection and greet it.
    pub async fn connect(&self, sender: ClientSender) -> ConnectionId {
        let connection_id = self
            .registry
            .register(sender, Timestamp::new(get_jst_timestamp()))
            .await;
        let welcome = ServerEvent::Welcome {
            connection_id: connection_id.to_string(),
            message: WELCOME_MESSAGE.to_string(),
        };
        self.broadcaster
            .send_to_connection(connection_id, &welcome)
            .await;
        tracing::info!("Connection '{}' opened", connection_id);
        connection_id
    }

    /// Handle one raw text frame. Failures are reported to the sending
    /// connection only.
    pub async fn handle_frame(&self, connection_id: ConnectionId, text: &str) {
        let result = match decode(text) {
            Ok(command) => self.dispatch(connection_id, command).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            self.reject(connection_id, &e).await;
        }
    }

    /// Send an `error` event to a single connection.
    pub async fn reject(&self, connection_id: ConnectionId, error: &CoordinatorError) {
        tracing::warn!("Rejected frame from '{}': {}", connection_id, error);
        self.broadcaster
            .send_to_connection(connection_id, &ServerEvent::error(error.to_string()))
            .await;
    }

    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        command: ClientCommand,
    ) -> Result<(), CoordinatorError> {
        tracing::debug!("'{}' sent {}", connection_id, command.kind());
        match command {
            ClientCommand::CreateRoom {
                room_name,
                password,
                max_players,
                player,
            } => {
                self.create_room(connection_id, room_name, password, max_players, player)
                    .await
            }
            ClientCommand::JoinRoom {
                room_code,
                password,
                player,
            } => {
                self.join_room(connection_id, room_code, password, player)
                    .await
            }
            ClientCommand::LeaveRoom {
                room_code,
                player_id,
            } => self.leave_room(connection_id, room_code, player_id).await,
            ClientCommand::KickPlayer {
                room_code,
                player_id,
            } => self.kick_player(connection_id, room_code, player_id).await,
            ClientCommand::ToggleReady {
                room_code,
                player_id,
                is_ready,
            } => {
                self.toggle_ready(connection_id, room_code, player_id, is_ready)
                    .await
            }
            ClientCommand::StartGame { room_code } => {
                self.start_game(connection_id, room_code).await
            }
            ClientCommand::ConfirmRole {
                room_code,
                player_id,
            } => self.confirm_role(connection_id, room_code, player_id).await,
            ClientCommand::NightAction {
                room_code,
                player_id,
                target_id,
                role,
            } => {
                self.night_action(connection_id, room_code, player_id, target_id, role)
                    .await
            }
            ClientCommand::Vote {
                room_code,
                voter_id,
                target_id,
            } => {
                self.vote(connection_id, room_code, voter_id, target_id)
                    .await
            }
            ClientCommand::ChatMessage {
                room_code,
                player_id,
                message,
                is_mafia_chat,
                ..
            } => {
                self.chat(connection_id, room_code, player_id, message, is_mafia_chat)
                    .await
            }
            ClientCommand::ResetGame { room_code } => {
                self.reset_game(connection_id, room_code).await
            }
        }
    }

    /// Connection closed: leave whatever room it was in, then forget it.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        // unregister first: a frame still in flight can no longer bind
        if let Some(binding) = self.registry.unregister(connection_id).await
            && let Ok(handle) = self.repository.get(&binding.room_code).await
        {
            let mut room = handle.lock().await;
            // a kick may have removed the player, or another connection may
            // have taken the seat, while we waited for the lock
            let still_seated = room.get_player(&binding.player_id).is_some()
                && !self
                    .registry
                    .is_bound(&binding.room_code, &binding.player_id)
                    .await;
            if still_seated && !room.closed {
                if let Err(e) = self.depart_left(&mut room, &binding.player_id).await {
                    tracing::warn!(
                        "Disconnect of '{}' from room {} failed: {}",
                        connection_id,
                        binding.room_code,
                        e
                    );
                }
            }
        }
        tracing::info!("Connection '{}' closed", connection_id);
    }

    /// Stop every phase timer. Rooms are dropped with the process.
    pub async fn shutdown(&self) {
        self.timers.cancel_all().await;
        tracing::info!(
            "Coordinator shut down with {} live room(s)",
            self.repository.count().await
        );
    }

    pub async fn active_timers(&self) -> usize {
        self.timers.active_count().await
    }

    pub(super) async fn find(&self, code: &RoomCode) -> Result<RoomHandle, RoomError> {
        self.repository
            .get(code)
            .await
            .map_err(|_| RoomError::RoomNotFound)
    }

    /// Lock a live room and resolve the player this connection acts for.
    ///
    /// `claimed` is the player id carried by the command, if any. It must be
    /// a member and must match the connection's binding.
    pub(super) async fn lock_as(
        &self,
        connection_id: ConnectionId,
        code: &RoomCode,
        claimed: Option<&PlayerId>,
    ) -> Result<(OwnedMutexGuard<Room>, PlayerId), CoordinatorError> {
        let room = self.find(code).await?.lock_owned().await;
        if room.closed {
            return Err(RoomError::RoomNotFound.into());
        }
        if let Some(claimed) = claimed {
            room.member(claimed)?;
        }
        let actor = match self.registry.binding(connection_id).await {
            Some(binding)
                if &binding.room_code == code
                    && claimed.is_none_or(|c| c == &binding.player_id) =>
            {
                binding.player_id
            }
            _ => return Err(RoomError::NotYourPlayer.into()),
        };
        Ok((room, actor))
    }

    /// Run a room command as the connection's player and publish its effects.
    pub(super) async fn apply_as<F>(
        &self,
        connection_id: ConnectionId,
        code: &RoomCode,
        claimed: Option<&PlayerId>,
        command: F,
    ) -> Result<(), CoordinatorError>
    where
        F: FnOnce(&mut Room, &PlayerId) -> Result<Vec<Outgoing>, RoomError> + Send,
    {
        let (mut room, actor) = self.lock_as(connection_id, code, claimed).await?;
        let seq = room.phase_seq;
        let events = command(&mut *room, &actor)?;
        self.publish(&room, seq, events).await;
        Ok(())
    }

    /// Deliver events and re-arm the phase timer if the phase changed.
    /// Must be called with the room lock held.
    pub(super) async fn publish(&self, room: &Room, seq_before: u64, events: Vec<Outgoing>) {
        self.broadcaster.deliver(room, events).await;
        if room.phase_seq != seq_before {
            self.rearm(room).await;
        }
    }

    async fn rearm(&self, room: &Room) {
        match room.config.durations.for_phase(room.phase) {
            Some(duration) => {
                let Some(sink) = self.this.upgrade() else {
                    return;
                };
                self.timers
                    .arm(
                        sink,
                        room.code.clone(),
                        room.phase_seq,
                        duration,
                        room.config.tick_interval,
                    )
                    .await;
                tracing::debug!(
                    "Armed {:?} timer for room {} ({})",
                    duration,
                    room.code,
                    room.phase
                );
            }
            None => self.timers.cancel(&room.code).await,
        }
    }

    /// Drop an emptied room. Must be called with the room lock held.
    pub(super) async fn close(&self, room: &mut Room) {
        room.closed = true;
        self.timers.cancel(&room.code).await;
        if let Err(e) = self.repository.delete(&room.code).await {
            tracing::warn!("Failed to delete room {}: {}", room.code, e);
        }
        tracing::info!("Room {} closed", room.code);
    }
}

#[async_trait]
impl TimerSink for RoomCoordinator {
    async fn on_tick(&self, code: RoomCode, seq: u64, remaining_secs: u64) {
        let Ok(handle) = self.repository.get(&code).await else {
            return;
        };
        let room = handle.lock().await;
        if room.closed {
            return;
        }
        let events = room.on_timer_tick(seq, remaining_secs);
        self.broadcaster.deliver(&room, events).await;
    }

    async fn on_expire(&self, code: RoomCode, seq: u64) {
        let Ok(handle) = self.repository.get(&code).await else {
            return;
        };
        let mut room = handle.lock().await;
        if room.closed {
            return;
        }
        let before = room.phase_seq;
        let events = room.on_timer_expired(seq);
        self.publish(&room, before, events).await;
    }
}
