//! WebSocket message DTOs and the message codec.
//!
//! Inbound frames are flat JSON objects discriminated by `type`; outbound
//! frames use a `{ "type": ..., "data": { ... } }` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    ChatText, EliminationCause, MaxPlayers, Phase, Player, PlayerId, PlayerName, Role, RoomCode,
    RoomEvent, RoomName, Winner,
};

/// Every inbound `type` the codec understands.
pub const INBOUND_TYPES: [&str; 11] = [
    "create-room",
    "join-room",
    "leave-room",
    "toggle-ready",
    "kick-player",
    "start-game",
    "confirm-role",
    "night-action",
    "vote",
    "chat-message",
    "reset-game",
];

/// MalformedMessage: the frame could not be turned into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid message format")]
    InvalidJson,

    #[error("Invalid message format: missing type")]
    MissingType,

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error("Missing or invalid fields for {kind}: {reason}")]
    InvalidFields { kind: String, reason: String },
}

/// Player description sent with create-room and join-room.
///
/// Host, ready, alive, and role flags sent by the client are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub id: PlayerId,
    pub name: PlayerName,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<PlayerPayload> for Player {
    fn from(payload: PlayerPayload) -> Self {
        Player::new(payload.id, payload.name, payload.avatar)
    }
}

/// A command sent by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    CreateRoom {
        room_name: RoomName,
        #[serde(default)]
        password: Option<String>,
        #[serde(default)]
        max_players: Option<MaxPlayers>,
        player: PlayerPayload,
    },
    JoinRoom {
        room_code: RoomCode,
        #[serde(default)]
        password: Option<String>,
        player: PlayerPayload,
    },
    LeaveRoom {
        room_code: RoomCode,
        player_id: PlayerId,
    },
    ToggleReady {
        room_code: RoomCode,
        player_id: PlayerId,
        is_ready: bool,
    },
    /// Host-only; `player_id` is the target.
    KickPlayer {
        room_code: RoomCode,
        player_id: PlayerId,
    },
    StartGame {
        room_code: RoomCode,
    },
    ConfirmRole {
        room_code: RoomCode,
        player_id: PlayerId,
    },
    NightAction {
        room_code: RoomCode,
        player_id: PlayerId,
        target_id: PlayerId,
        role: Role,
    },
    /// A missing or null `targetId` abstains.
    Vote {
        room_code: RoomCode,
        voter_id: PlayerId,
        #[serde(default)]
        target_id: Option<PlayerId>,
    },
    ChatMessage {
        room_code: RoomCode,
        player_id: PlayerId,
        /// Required on the wire; the stored name is used instead.
        player_name: String,
        message: ChatText,
        is_mafia_chat: bool,
    },
    ResetGame {
        room_code: RoomCode,
    },
}

impl ClientCommand {
    /// Wire name of the command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientCommand::CreateRoom { .. } => "create-room",
            ClientCommand::JoinRoom { .. } => "join-room",
            ClientCommand::LeaveRoom { .. } => "leave-room",
            ClientCommand::ToggleReady { .. } => "toggle-ready",
            ClientCommand::KickPlayer { .. } => "kick-player",
            ClientCommand::StartGame { .. } => "start-game",
            ClientCommand::ConfirmRole { .. } => "confirm-role",
            ClientCommand::NightAction { .. } => "night-action",
            ClientCommand::Vote { .. } => "vote",
            ClientCommand::ChatMessage { .. } => "chat-message",
            ClientCommand::ResetGame { .. } => "reset-game",
        }
    }
}

/// Decode one inbound frame.
pub fn decode(text: &str) -> Result<ClientCommand, CodecError> {
    let value: Value = serde_json::from_str(text).map_err(|_| CodecError::InvalidJson)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingType)?
        .to_string();
    if !INBOUND_TYPES.contains(&kind.as_str()) {
        return Err(CodecError::UnknownType(kind));
    }
    serde_json::from_value(value).map_err(|e| CodecError::InvalidFields {
        kind,
        reason: e.to_string(),
    })
}

/// Encode one outbound event.
pub fn encode(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Player as seen by other clients.
///
/// `role` is only present where roles are meant to be public (eliminations
/// and game over).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl PlayerView {
    /// View without the role.
    pub fn public(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.to_string(),
            avatar: player.avatar.clone(),
            is_host: player.is_host,
            is_ready: player.is_ready,
            is_alive: player.is_alive,
            role: None,
        }
    }

    /// View including the role.
    pub fn revealed(player: &Player) -> Self {
        Self {
            role: player.role,
            ..Self::public(player)
        }
    }
}

fn public_list(players: &[Player]) -> Vec<PlayerView> {
    players.iter().map(PlayerView::public).collect()
}

/// An event sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    Welcome {
        connection_id: String,
        message: String,
    },
    RoomCreated {
        room_code: String,
        room_name: String,
        room_password: Option<String>,
        max_players: usize,
        players: Vec<PlayerView>,
        current_player: PlayerView,
        phase: Phase,
    },
    PlayerJoined {
        room_code: String,
        room_name: String,
        max_players: usize,
        players: Vec<PlayerView>,
        player: PlayerView,
        phase: Phase,
    },
    PlayerLeft {
        player_id: String,
        players: Vec<PlayerView>,
        host_id: Option<String>,
    },
    PlayerKicked {
        player_id: String,
        players: Vec<PlayerView>,
        host_id: Option<String>,
    },
    PlayerReady {
        player_id: String,
        is_ready: bool,
        players: Vec<PlayerView>,
    },
    GameStarted {
        phase: Phase,
        players: Vec<PlayerView>,
    },
    RoleAssigned {
        player_id: String,
        role: Role,
        teammates: Vec<String>,
    },
    RoleConfirmed {
        player_id: String,
    },
    PhaseChanged {
        phase: Phase,
        timer: u64,
        day_count: u32,
        night_count: u32,
    },
    TimerUpdate {
        timer: u64,
    },
    NightActionReceived {
        player_id: String,
        target_id: String,
        role: Role,
    },
    InvestigationResult {
        target_id: String,
        is_mafia: bool,
    },
    VoteReceived {
        voter_id: String,
        target_id: Option<String>,
    },
    PlayerEliminated {
        player: PlayerView,
        cause: EliminationCause,
    },
    ChatMessage {
        id: u64,
        player_id: String,
        player_name: String,
        message: String,
        timestamp: i64,
        is_mafia_chat: bool,
    },
    GameOver {
        winner: Winner,
        players: Vec<PlayerView>,
    },
    GameReset {
        players: Vec<PlayerView>,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

impl From<RoomEvent> for ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::RoomCreated {
                code,
                name,
                password,
                max_players,
                players,
                current_player,
                phase,
            } => ServerEvent::RoomCreated {
                room_code: code.to_string(),
                room_name: name,
                room_password: password,
                max_players,
                players: public_list(&players),
                current_player: PlayerView::public(&current_player),
                phase,
            },
            RoomEvent::PlayerJoined {
                code,
                name,
                max_players,
                players,
                player,
                phase,
            } => ServerEvent::PlayerJoined {
                room_code: code.to_string(),
                room_name: name,
                max_players,
                players: public_list(&players),
                player: PlayerView::public(&player),
                phase,
            },
            RoomEvent::PlayerLeft {
                player_id,
                players,
                host_id,
            } => ServerEvent::PlayerLeft {
                player_id: player_id.to_string(),
                players: public_list(&players),
                host_id: host_id.map(String::from),
            },
            RoomEvent::PlayerKicked {
                player_id,
                players,
                host_id,
            } => ServerEvent::PlayerKicked {
                player_id: player_id.to_string(),
                players: public_list(&players),
                host_id: host_id.map(String::from),
            },
            RoomEvent::PlayerReady {
                player_id,
                is_ready,
                players,
            } => ServerEvent::PlayerReady {
                player_id: player_id.to_string(),
                is_ready,
                players: public_list(&players),
            },
            RoomEvent::GameStarted { phase, players } => ServerEvent::GameStarted {
                phase,
                players: public_list(&players),
            },
            RoomEvent::RoleAssigned {
                player_id,
                role,
                teammates,
            } => ServerEvent::RoleAssigned {
                player_id: player_id.to_string(),
                role,
                teammates: teammates.into_iter().map(String::from).collect(),
            },
            RoomEvent::RoleConfirmed { player_id } => ServerEvent::RoleConfirmed {
                player_id: player_id.to_string(),
            },
            RoomEvent::PhaseChanged {
                phase,
                timer,
                day_count,
                night_count,
            } => ServerEvent::PhaseChanged {
                phase,
                timer,
                day_count,
                night_count,
            },
            RoomEvent::TimerUpdate { timer } => ServerEvent::TimerUpdate { timer },
            RoomEvent::NightActionReceived {
                player_id,
                target_id,
                role,
            } => ServerEvent::NightActionReceived {
                player_id: player_id.to_string(),
                target_id: target_id.to_string(),
                role,
            },
            RoomEvent::InvestigationResult {
                target_id,
                is_mafia,
            } => ServerEvent::InvestigationResult {
                target_id: target_id.to_string(),
                is_mafia,
            },
            RoomEvent::VoteReceived {
                voter_id,
                target_id,
            } => ServerEvent::VoteReceived {
                voter_id: voter_id.to_string(),
                target_id: target_id.map(String::from),
            },
            RoomEvent::PlayerEliminated { player, cause } => ServerEvent::PlayerEliminated {
                player: PlayerView::revealed(&player),
                cause,
            },
            RoomEvent::ChatMessage(message) => ServerEvent::ChatMessage {
                id: message.id,
                player_id: message.from.to_string(),
                player_name: message.from_name.to_string(),
                message: message.text.as_str().to_string(),
                timestamp: message.timestamp.value(),
                is_mafia_chat: message.mafia_only,
            },
            RoomEvent::GameOver { winner, players } => ServerEvent::GameOver {
                winner,
                players: players.iter().map(PlayerView::revealed).collect(),
            },
            RoomEvent::GameReset { players } => ServerEvent::GameReset {
                players: public_list(&players),
            },
        }
    }
}
