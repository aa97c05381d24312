//! UseCase: ルームの作成・参加・退出・キック
//!
//! 接続とプレイヤーの紐付け（バインディング）はここでのみ変更されます。
//! ルームが空になった場合はその場でルームを閉じ、Repository から削除します。

use mafia_shared::time::get_jst_timestamp;

use crate::{
    domain::{
        ConnectionId, Departure, MaxPlayers, Outgoing, Player, PlayerId, Room, RoomCode,
        RoomError, RoomName, Timestamp,
    },
    infrastructure::dto::websocket::PlayerPayload,
};

use super::{coordinator::RoomCoordinator, error::CoordinatorError};

impl RoomCoordinator {
    pub(super) async fn create_room(
        &self,
        connection_id: ConnectionId,
        room_name: RoomName,
        password: Option<String>,
        max_players: Option<MaxPlayers>,
        player: PlayerPayload,
    ) -> Result<(), CoordinatorError> {
        if self.registry.binding(connection_id).await.is_some() {
            return Err(RoomError::AlreadyInRoom.into());
        }

        let host = Player::from(player);
        let host_id = host.id.clone();
        let config = self.config.clone();
        let created_at = Timestamp::new(get_jst_timestamp());
        let password = password.filter(|p| !p.is_empty());
        let handle = self
            .repository
            .create(Box::new(move |code| {
                Room::new(
                    code,
                    room_name,
                    password,
                    max_players.unwrap_or_default(),
                    host,
                    config,
                    created_at,
                )
            }))
            .await?;

        let mut room = handle.lock().await;
        if !self
            .registry
            .bind(connection_id, room.code.clone(), host_id.clone())
            .await
        {
            // the connection closed while this frame was in flight
            tracing::debug!(
                "Connection '{}' closed before room {} was bound",
                connection_id,
                room.code
            );
            self.close(&mut room).await;
            return Ok(());
        }
        self.broadcaster.deliver(&room, room.created_event()).await;
        tracing::info!(
            "Room {} '{}' created by '{}'",
            room.code,
            room.name.as_str(),
            host_id
        );
        Ok(())
    }

    pub(super) async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        password: Option<String>,
        player: PlayerPayload,
    ) -> Result<(), CoordinatorError> {
        if self.registry.binding(connection_id).await.is_some() {
            return Err(RoomError::AlreadyInRoom.into());
        }

        let handle = self.find(&room_code).await?;
        let mut room = handle.lock().await;
        if room.closed {
            return Err(RoomError::RoomNotFound.into());
        }
        let player = Player::from(player);
        let player_id = player.id.clone();
        let events = room.join(player, password.as_deref().filter(|p| !p.is_empty()))?;

        if !self
            .registry
            .bind(connection_id, room.code.clone(), player_id.clone())
            .await
        {
            // the connection closed while this frame was in flight; the join
            // events are dropped unpublished
            tracing::debug!(
                "Connection '{}' closed before joining room {}",
                connection_id,
                room.code
            );
            room.remove_player(&player_id, Departure::Left)?;
            return Ok(());
        }
        self.broadcaster.deliver(&room, events).await;
        tracing::info!(
            "'{}' joined room {} ({}/{})",
            player_id,
            room.code,
            room.players.len(),
            room.max_players
        );
        Ok(())
    }

    pub(super) async fn leave_room(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        player_id: PlayerId,
    ) -> Result<(), CoordinatorError> {
        let (mut room, actor) = self
            .lock_as(connection_id, &room_code, Some(&player_id))
            .await?;
        self.depart_left(&mut room, &actor).await
    }

    pub(super) async fn kick_player(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        target_id: PlayerId,
    ) -> Result<(), CoordinatorError> {
        let (mut room, actor) = self.lock_as(connection_id, &room_code, None).await?;
        let seq = room.phase_seq;
        let events = room.kick(&actor, &target_id)?;

        // the kicked player still sees the kick notice
        self.broadcaster.deliver(&room, events).await;
        self.registry.unbind_player(&room.code, &target_id).await;
        tracing::info!("'{}' kicked '{}' from room {}", actor, target_id, room.code);
        self.after_departure(&mut room, seq, Vec::new()).await;
        Ok(())
    }

    /// Remove a player who left or disconnected. Must be called with the
    /// room lock held.
    pub(super) async fn depart_left(
        &self,
        room: &mut Room,
        player_id: &PlayerId,
    ) -> Result<(), CoordinatorError> {
        let seq = room.phase_seq;
        let events = room.remove_player(player_id, Departure::Left)?;
        self.registry.unbind_player(&room.code, player_id).await;
        tracing::info!("'{}' left room {}", player_id, room.code);
        self.after_departure(room, seq, events).await;
        Ok(())
    }

    async fn after_departure(&self, room: &mut Room, seq: u64, events: Vec<Outgoing>) {
        if room.is_empty() {
            self.close(room).await;
        } else {
            self.publish(room, seq, events).await;
        }
    }
}
