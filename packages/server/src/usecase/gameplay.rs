//! UseCase: ゲーム進行コマンド
//!
//! 準備完了・開始・役職確認・夜の行動・投票・チャット・リセット。
//! いずれも接続に紐付いたプレイヤーとして実行され、ルール上の検証は
//! ドメインモデル（`Room`）が行います。

use mafia_shared::time::get_jst_timestamp;

use crate::domain::{ChatText, ConnectionId, PlayerId, Role, RoomCode, Timestamp};

use super::{coordinator::RoomCoordinator, error::CoordinatorError};

impl RoomCoordinator {
    pub(super) async fn toggle_ready(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        player_id: PlayerId,
        is_ready: bool,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, Some(&player_id), |room, actor| {
            room.toggle_ready(actor, is_ready)
        })
        .await
    }

    pub(super) async fn start_game(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, None, |room, actor| {
            let events = room.start_game(actor)?;
            tracing::info!(
                "Room {} started a game with {} players",
                room.code,
                room.players.len()
            );
            Ok(events)
        })
        .await
    }

    pub(super) async fn confirm_role(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        player_id: PlayerId,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, Some(&player_id), |room, actor| {
            room.confirm_role(actor)
        })
        .await
    }

    pub(super) async fn night_action(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        player_id: PlayerId,
        target_id: PlayerId,
        role: Role,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, Some(&player_id), |room, actor| {
            room.submit_night_action(actor, &target_id, role)
        })
        .await
    }

    pub(super) async fn vote(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        voter_id: PlayerId,
        target_id: Option<PlayerId>,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, Some(&voter_id), |room, actor| {
            room.cast_vote(actor, target_id.as_ref())
        })
        .await
    }

    pub(super) async fn chat(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
        player_id: PlayerId,
        message: ChatText,
        is_mafia_chat: bool,
    ) -> Result<(), CoordinatorError> {
        let timestamp = Timestamp::new(get_jst_timestamp());
        self.apply_as(connection_id, &room_code, Some(&player_id), |room, actor| {
            room.post_chat(actor, message, is_mafia_chat, timestamp)
        })
        .await
    }

    pub(super) async fn reset_game(
        &self,
        connection_id: ConnectionId,
        room_code: RoomCode,
    ) -> Result<(), CoordinatorError> {
        self.apply_as(connection_id, &room_code, None, |room, actor| {
            let events = room.reset(actor)?;
            tracing::info!("Room {} reset to the lobby", room.code);
            Ok(events)
        })
        .await
    }
}
