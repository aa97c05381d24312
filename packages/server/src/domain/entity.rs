//! Core domain models: players, rooms, and chat messages.
//!
//! Membership rules live here; the game-phase state machine is implemented
//! on [`Room`] in [`super::game`].

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    event::{Outgoing, RoomEvent},
    settings::{GameConfig, MIN_PLAYERS},
    value_object::{ChatText, MaxPlayers, PlayerId, PlayerName, RoomCode, RoomName, Timestamp},
};

/// Secret role dealt at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mafia,
    Villager,
    Doctor,
    Detective,
}

impl Role {
    /// Whether this role acts at night.
    pub fn has_night_action(self) -> bool {
        !matches!(self, Role::Villager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Mafia => "mafia",
            Role::Villager => "villager",
            Role::Doctor => "doctor",
            Role::Detective => "detective",
        };
        f.write_str(s)
    }
}

/// One state of the per-room state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Lobby,
    RoleAssignment,
    Night,
    Day,
    Voting,
    Elimination,
    GameOver,
}

impl Phase {
    /// Phases in which roles exist and alive/dead matters.
    pub fn is_in_game(self) -> bool {
        !matches!(self, Phase::Lobby | Phase::GameOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Lobby => "lobby",
            Phase::RoleAssignment => "role-assignment",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Voting => "voting",
            Phase::Elimination => "elimination",
            Phase::GameOver => "game-over",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Mafia,
    Villagers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliminationCause {
    Night,
    Vote,
}

/// Represents a player seated in a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    /// Avatar glyph
    pub avatar: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_alive: bool,
    pub role: Option<Role>,
}

impl Player {
    /// Create a new player. Missing avatars fall back to the first letter of the name.
    pub fn new(id: PlayerId, name: PlayerName, avatar: Option<String>) -> Self {
        let avatar = avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| name.default_avatar());
        Self {
            id,
            name,
            avatar,
            is_host: false,
            is_ready: false,
            is_alive: true,
            role: None,
        }
    }

    pub fn is_mafia(&self) -> bool {
        self.role == Some(Role::Mafia)
    }
}

/// Represents a chat message in the domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub from: PlayerId,
    pub from_name: PlayerName,
    pub text: ChatText,
    pub mafia_only: bool,
    pub timestamp: Timestamp,
}

/// A night action recorded for the current night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightAction {
    pub role: Role,
    pub target: PlayerId,
}

/// How a player left the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Left,
    Kicked,
}

/// Represents one isolated game instance
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub name: RoomName,
    /// Compared in plaintext against join attempts
    pub password: Option<String>,
    pub max_players: usize,
    /// Join order
    pub players: Vec<Player>,
    pub phase: Phase,
    /// Bumped on every phase transition; stale timer signals carry an old value.
    pub phase_seq: u64,
    pub day_count: u32,
    pub night_count: u32,
    /// voter -> target (`None` = abstain), cleared each voting round
    pub votes: BTreeMap<PlayerId, Option<PlayerId>>,
    /// actor -> action, cleared each night
    pub night_actions: BTreeMap<PlayerId, NightAction>,
    /// Players who acknowledged their role during role assignment
    pub confirmations: BTreeSet<PlayerId>,
    pub chat_log: Vec<ChatMessage>,
    pub last_eliminated: Option<Player>,
    pub winner: Option<Winner>,
    pub config: GameConfig,
    pub created_at: Timestamp,
    /// Set once the room has been removed from the store
    pub closed: bool,
}

impl Room {
    /// Create a room with `host` as its first player.
    ///
    /// The host starts out ready.
    pub fn new(
        code: RoomCode,
        name: RoomName,
        password: Option<String>,
        max_players: MaxPlayers,
        mut host: Player,
        config: GameConfig,
        created_at: Timestamp,
    ) -> Self {
        host.is_host = true;
        host.is_ready = true;
        host.is_alive = true;
        host.role = None;

        Self {
            code,
            name,
            password: password.filter(|p| !p.is_empty()),
            max_players: max_players.value(),
            players: vec![host],
            phase: Phase::Lobby,
            phase_seq: 0,
            day_count: 0,
            night_count: 0,
            votes: BTreeMap::new(),
            night_actions: BTreeMap::new(),
            confirmations: BTreeSet::new(),
            chat_log: Vec::new(),
            last_eliminated: None,
            winner: None,
            config,
            created_at,
            closed: false,
        }
    }

    /// Event sent back to the creator.
    pub fn created_event(&self) -> Vec<Outgoing> {
        let Some(host) = self.host() else {
            return Vec::new();
        };
        vec![Outgoing::player(
            host.id.clone(),
            RoomEvent::RoomCreated {
                code: self.code.clone(),
                name: self.name.as_str().to_string(),
                password: self.password.clone(),
                max_players: self.max_players,
                players: self.players.clone(),
                current_player: host.clone(),
                phase: self.phase,
            },
        )]
    }

    /// Get a player by ID
    pub fn get_player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    pub(crate) fn get_player_mut(&mut self, player_id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == player_id)
    }

    /// Look up a member, failing with `PlayerNotFound`.
    pub fn member(&self, player_id: &PlayerId) -> Result<&Player, RoomError> {
        self.get_player(player_id).ok_or(RoomError::PlayerNotFound)
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn host_id(&self) -> Option<PlayerId> {
        self.host().map(|p| p.id.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }

    /// Ids of every mafia member, alive or dead.
    pub fn mafia_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_mafia())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Public chat messages in order.
    pub fn public_chat(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat_log.iter().filter(|m| !m.mafia_only)
    }

    /// Mafia-only chat messages in order.
    pub fn mafia_chat(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat_log.iter().filter(|m| m.mafia_only)
    }

    pub(crate) fn ensure_phase(&self, phase: Phase) -> Result<(), RoomError> {
        if self.phase != phase {
            return Err(RoomError::WrongPhase(self.phase));
        }
        Ok(())
    }

    pub(crate) fn ensure_host(&self, player_id: &PlayerId) -> Result<(), RoomError> {
        if !self.member(player_id)?.is_host {
            return Err(RoomError::NotHost);
        }
        Ok(())
    }

    /// Seat a new player.
    ///
    /// # Errors
    ///
    /// Rejected outside the lobby, on a password mismatch, when the room is
    /// full, or when the id or (case-insensitive) name is already taken.
    pub fn join(
        &mut self,
        mut player: Player,
        password: Option<&str>,
    ) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::Lobby)?;
        if let Some(expected) = &self.password
            && password != Some(expected.as_str())
        {
            return Err(RoomError::WrongPassword);
        }
        if self.players.len() >= self.max_players {
            return Err(RoomError::RoomFull {
                capacity: self.max_players,
            });
        }
        if self.get_player(&player.id).is_some() {
            return Err(RoomError::DuplicatePlayerId(player.id.to_string()));
        }
        if self.players.iter().any(|p| p.name.collides_with(&player.name)) {
            return Err(RoomError::DuplicateName(player.name.to_string()));
        }

        player.is_host = false;
        player.is_ready = false;
        player.is_alive = true;
        player.role = None;
        self.players.push(player.clone());

        Ok(vec![Outgoing::room(RoomEvent::PlayerJoined {
            code: self.code.clone(),
            name: self.name.as_str().to_string(),
            max_players: self.max_players,
            players: self.players.clone(),
            player,
            phase: self.phase,
        })])
    }

    /// Remove `player_id` from the room.
    ///
    /// Host duty passes to the first remaining player in join order. When the
    /// room becomes empty no events are produced; the caller deletes it.
    pub fn remove_player(
        &mut self,
        player_id: &PlayerId,
        departure: Departure,
    ) -> Result<Vec<Outgoing>, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| &p.id == player_id)
            .ok_or(RoomError::PlayerNotFound)?;
        let removed = self.players.remove(index);

        if self.players.is_empty() {
            return Ok(Vec::new());
        }
        if removed.is_host {
            self.players[0].is_host = true;
        }

        let players = self.players.clone();
        let host_id = self.host_id();
        let player_id = removed.id.clone();
        let event = match departure {
            Departure::Left => RoomEvent::PlayerLeft {
                player_id,
                players,
                host_id,
            },
            Departure::Kicked => RoomEvent::PlayerKicked {
                player_id,
                players,
                host_id,
            },
        };
        let mut events = vec![Outgoing::room(event)];
        events.extend(self.after_departure(&removed.id));
        Ok(events)
    }

    /// Host-only removal of another member.
    pub fn kick(
        &mut self,
        requester: &PlayerId,
        target: &PlayerId,
    ) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_host(requester)?;
        if requester == target {
            return Err(RoomError::CannotKickSelf);
        }
        self.member(target)?;
        self.remove_player(target, Departure::Kicked)
    }

    /// Whether the lobby → role-assignment gate is satisfied.
    pub fn ready_gate_open(&self) -> bool {
        self.players.len() >= MIN_PLAYERS && self.players.iter().all(|p| p.is_ready)
    }

    /// Set a player's ready flag; starts the game once the gate opens.
    pub fn toggle_ready(
        &mut self,
        player_id: &PlayerId,
        is_ready: bool,
    ) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::Lobby)?;
        let player = self
            .get_player_mut(player_id)
            .ok_or(RoomError::PlayerNotFound)?;
        let changed = player.is_ready != is_ready;
        player.is_ready = is_ready;

        let mut events = vec![Outgoing::room(RoomEvent::PlayerReady {
            player_id: player_id.clone(),
            is_ready,
            players: self.players.clone(),
        })];
        if changed && is_ready && self.ready_gate_open() {
            events.extend(self.begin_role_assignment());
        }
        Ok(events)
    }

    /// Host-only explicit start, valid once the ready-gate is satisfied.
    pub fn start_game(&mut self, requester: &PlayerId) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::Lobby)?;
        self.ensure_host(requester)?;
        if !self.ready_gate_open() {
            return Err(RoomError::NotReady { min: MIN_PLAYERS });
        }
        Ok(self.begin_role_assignment())
    }

    /// Append a chat message.
    ///
    /// Mafia chat requires the sender to be mafia. During a game dead players
    /// are silenced.
    pub fn post_chat(
        &mut self,
        sender: &PlayerId,
        text: ChatText,
        mafia_only: bool,
        timestamp: Timestamp,
    ) -> Result<Vec<Outgoing>, RoomError> {
        let player = self.member(sender)?;
        if self.phase.is_in_game() && !player.is_alive {
            return Err(RoomError::PlayerDead);
        }
        if mafia_only && !player.is_mafia() {
            return Err(RoomError::NotMafia);
        }
        if self.chat_log.len() >= self.config.chat_capacity {
            return Err(RoomError::ChatLogFull {
                capacity: self.config.chat_capacity,
            });
        }

        let message = ChatMessage {
            id: self.chat_log.len() as u64 + 1,
            from: player.id.clone(),
            from_name: player.name.clone(),
            text,
            mafia_only,
            timestamp,
        };
        self.chat_log.push(message.clone());

        let event = RoomEvent::ChatMessage(message);
        Ok(vec![if mafia_only {
            Outgoing::mafia(event)
        } else {
            Outgoing::room(event)
        }])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::Audience;

    pub(crate) fn pid(s: &str) -> PlayerId {
        PlayerId::new(s.to_string()).unwrap()
    }

    pub(crate) fn player(id: &str, name: &str) -> Player {
        Player::new(pid(id), PlayerName::new(name.to_string()).unwrap(), None)
    }

    pub(crate) fn room_with(host: &str, max_players: usize) -> Room {
        Room::new(
            RoomCode::new("TOWN01".to_string()).unwrap(),
            RoomName::new("Town".to_string()).unwrap(),
            None,
            MaxPlayers::new(max_players).unwrap(),
            player(host, &format!("{host}-name")),
            GameConfig::default(),
            Timestamp::new(0),
        )
    }

    /// Room with `ids[0]` as host and the rest joined, nobody else ready.
    pub(crate) fn lobby(ids: &[&str]) -> Room {
        let mut room = room_with(ids[0], 12);
        for id in &ids[1..] {
            room.join(player(id, &format!("{id}-name")), None).unwrap();
        }
        room
    }

    #[test]
    fn test_room_new_host_is_ready() {
        // テスト項目: ルーム作成者はホストとなり、準備完了状態で参加する
        // when (操作):
        let room = room_with("p1", 4);

        // then (期待する結果):
        assert_eq!(room.players.len(), 1);
        assert!(room.players[0].is_host);
        assert!(room.players[0].is_ready);
        assert_eq!(room.phase, Phase::Lobby);
    }

    #[test]
    fn test_join_room_full() {
        // テスト項目: 満員のルームには参加できない
        // given (前提条件):
        let mut room = room_with("p1", 4);
        for id in ["p2", "p3", "p4"] {
            room.join(player(id, id), None).unwrap();
        }

        // when (操作):
        let result = room.join(player("p5", "p5"), None);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::RoomFull { capacity: 4 });
        assert_eq!(room.players.len(), 4);
    }

    #[test]
    fn test_join_wrong_password() {
        // テスト項目: パスワードが一致しない場合は参加できない
        // given (前提条件):
        let mut room = room_with("p1", 4);
        room.password = Some("secret".to_string());

        // then (期待する結果):
        assert_eq!(
            room.join(player("p2", "Bob"), Some("nope")).unwrap_err(),
            RoomError::WrongPassword
        );
        assert_eq!(
            room.join(player("p2", "Bob"), None).unwrap_err(),
            RoomError::WrongPassword
        );
        assert!(room.join(player("p2", "Bob"), Some("secret")).is_ok());
    }

    #[test]
    fn test_join_duplicate_name_rejected() {
        // テスト項目: 同じ名前（大文字小文字を区別しない）のプレイヤーは参加できない
        // given (前提条件):
        let mut room = room_with("p1", 4);
        room.join(player("p2", "Bob"), None).unwrap();

        // when (操作):
        let result = room.join(player("p3", "BOB"), None);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::DuplicateName("BOB".to_string()));
    }

    #[test]
    fn test_join_broadcasts_to_room() {
        // テスト項目: 参加はルーム全体に通知され、参加者は準備未完了となる
        // given (前提条件):
        let mut room = room_with("p1", 4);
        let mut joiner = player("p2", "Bob");
        joiner.is_host = true;
        joiner.is_ready = true;

        // when (操作):
        let events = room.join(joiner, None).unwrap();

        // then (期待する結果):
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].audience, Audience::Room);
        assert!(!room.players[1].is_host);
        assert!(!room.players[1].is_ready);
    }

    #[test]
    fn test_host_leaves_next_in_join_order_becomes_host() {
        // テスト項目: ホストが退出すると参加順で次のプレイヤーがホストになる
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3"]);

        // when (操作):
        let events = room.remove_player(&pid("p1"), Departure::Left).unwrap();

        // then (期待する結果):
        assert_eq!(room.host_id(), Some(pid("p2")));
        assert_eq!(room.players.iter().filter(|p| p.is_host).count(), 1);
        match &events[0].event {
            RoomEvent::PlayerLeft {
                player_id, host_id, ..
            } => {
                assert_eq!(player_id, &pid("p1"));
                assert_eq!(host_id, &Some(pid("p2")));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_last_player_leaves_room_empty() {
        // テスト項目: 最後のプレイヤーが退出するとルームは空になり、イベントは発生しない
        // given (前提条件):
        let mut room = room_with("p1", 4);

        // when (操作):
        let events = room.remove_player(&pid("p1"), Departure::Left).unwrap();

        // then (期待する結果):
        assert!(events.is_empty());
        assert!(room.is_empty());
    }

    #[test]
    fn test_kick_requires_host() {
        // テスト項目: ホスト以外はキックできず、ホスト自身もキックできない
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3"]);

        // then (期待する結果):
        assert_eq!(room.kick(&pid("p2"), &pid("p3")).unwrap_err(), RoomError::NotHost);
        assert_eq!(
            room.kick(&pid("p1"), &pid("p1")).unwrap_err(),
            RoomError::CannotKickSelf
        );
        assert_eq!(
            room.kick(&pid("p1"), &pid("zz")).unwrap_err(),
            RoomError::PlayerNotFound
        );
        assert!(room.kick(&pid("p1"), &pid("p3")).is_ok());
        assert_eq!(room.players.len(), 2);
    }

    #[test]
    fn test_all_ready_starts_game_exactly_once() {
        // テスト項目: 4 人全員が準備完了になった時点で一度だけゲームが開始される
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3", "p4"]);

        // when (操作):
        let mut started = 0;
        for id in ["p2", "p3", "p4"] {
            let events = room.toggle_ready(&pid(id), true).unwrap();
            started += events
                .iter()
                .filter(|o| matches!(o.event, RoomEvent::GameStarted { .. }))
                .count();
        }

        // then (期待する結果):
        assert_eq!(started, 1);
        assert_eq!(room.phase, Phase::RoleAssignment);
        assert!(room.players.iter().all(|p| p.role.is_some()));
    }

    #[test]
    fn test_ready_gate_needs_four_players() {
        // テスト項目: 3 人では全員準備完了でもゲームは開始されない
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3"]);

        // when (操作):
        room.toggle_ready(&pid("p2"), true).unwrap();
        room.toggle_ready(&pid("p3"), true).unwrap();

        // then (期待する結果):
        assert_eq!(room.phase, Phase::Lobby);
        assert_eq!(
            room.start_game(&pid("p1")).unwrap_err(),
            RoomError::NotReady { min: 4 }
        );
    }

    #[test]
    fn test_start_game_after_unready_player_leaves() {
        // テスト項目: 準備未完了のプレイヤーが退出した後、ホストが明示的に開始できる
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3", "p4", "p5"]);
        for id in ["p2", "p3", "p4"] {
            room.toggle_ready(&pid(id), true).unwrap();
        }
        room.remove_player(&pid("p5"), Departure::Left).unwrap();

        // then (期待する結果):
        assert_eq!(room.phase, Phase::Lobby);
        assert_eq!(room.start_game(&pid("p2")).unwrap_err(), RoomError::NotHost);
        assert!(room.start_game(&pid("p1")).is_ok());
        assert_eq!(room.phase, Phase::RoleAssignment);
    }

    #[test]
    fn test_toggle_ready_outside_lobby_rejected() {
        // テスト項目: ロビー以外のフェーズでは準備状態を変更できない
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3", "p4"]);
        room.phase = Phase::Day;

        // then (期待する結果):
        assert_eq!(
            room.toggle_ready(&pid("p2"), true).unwrap_err(),
            RoomError::WrongPhase(Phase::Day)
        );
    }

    #[test]
    fn test_public_chat_goes_to_room() {
        // テスト項目: 公開チャットはルーム全体に配信され、ログに追加される
        // given (前提条件):
        let mut room = lobby(&["p1", "p2"]);

        // when (操作):
        let events = room
            .post_chat(
                &pid("p2"),
                ChatText::new("hi".to_string()).unwrap(),
                false,
                Timestamp::new(1),
            )
            .unwrap();

        // then (期待する結果):
        assert_eq!(events[0].audience, Audience::Room);
        assert_eq!(room.public_chat().count(), 1);
        assert_eq!(room.mafia_chat().count(), 0);
    }

    #[test]
    fn test_mafia_chat_requires_mafia_role() {
        // テスト項目: マフィア以外はマフィアチャットを送信できず、マフィアの送信はマフィアのみに配信される
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3", "p4"]);
        room.phase = Phase::Day;
        room.players[0].role = Some(Role::Mafia);
        room.players[1].role = Some(Role::Villager);
        let text = || ChatText::new("psst".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(
            room.post_chat(&pid("p2"), text(), true, Timestamp::new(1))
                .unwrap_err(),
            RoomError::NotMafia
        );
        let events = room
            .post_chat(&pid("p1"), text(), true, Timestamp::new(1))
            .unwrap();
        assert_eq!(events[0].audience, Audience::Mafia);
        assert_eq!(room.mafia_chat().count(), 1);
    }

    #[test]
    fn test_dead_player_cannot_chat_during_game() {
        // テスト項目: ゲーム中に死亡したプレイヤーはチャットできない
        // given (前提条件):
        let mut room = lobby(&["p1", "p2", "p3", "p4"]);
        room.phase = Phase::Day;
        room.players[1].is_alive = false;

        // when (操作):
        let result = room.post_chat(
            &pid("p2"),
            ChatText::new("boo".to_string()).unwrap(),
            false,
            Timestamp::new(1),
        );

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::PlayerDead);
        assert!(room.chat_log.is_empty());
    }

    #[test]
    fn test_chat_capacity_exceeded() {
        // テスト項目: チャットログが上限に達したらエラーが返される
        // given (前提条件):
        let mut room = lobby(&["p1"]);
        room.config.chat_capacity = 1;
        let text = || ChatText::new("hello".to_string()).unwrap();
        room.post_chat(&pid("p1"), text(), false, Timestamp::new(1))
            .unwrap();

        // when (操作):
        let result = room.post_chat(&pid("p1"), text(), false, Timestamp::new(2));

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RoomError::ChatLogFull { capacity: 1 });
        assert_eq!(room.chat_log.len(), 1);
    }
}
