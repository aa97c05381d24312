//! Domain events produced by room commands.
//!
//! Every accepted command yields zero or more [`Outgoing`] events. The
//! [`Audience`] decides who may see an event; role secrets never travel
//! with [`Audience::Room`].

use super::{
    entity::{ChatMessage, EliminationCause, Phase, Player, Role, Winner},
    value_object::{PlayerId, RoomCode},
};

/// Who an event is delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every connection bound to the room.
    Room,
    /// Only the connection bound to this player.
    Player(PlayerId),
    /// Only connections bound to mafia players.
    Mafia,
}

/// Something that happened in a room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    RoomCreated {
        code: RoomCode,
        name: String,
        password: Option<String>,
        max_players: usize,
        players: Vec<Player>,
        current_player: Player,
        phase: Phase,
    },
    PlayerJoined {
        code: RoomCode,
        name: String,
        max_players: usize,
        players: Vec<Player>,
        player: Player,
        phase: Phase,
    },
    PlayerLeft {
        player_id: PlayerId,
        players: Vec<Player>,
        host_id: Option<PlayerId>,
    },
    PlayerKicked {
        player_id: PlayerId,
        players: Vec<Player>,
        host_id: Option<PlayerId>,
    },
    PlayerReady {
        player_id: PlayerId,
        is_ready: bool,
        players: Vec<Player>,
    },
    GameStarted {
        phase: Phase,
        players: Vec<Player>,
    },
    RoleAssigned {
        player_id: PlayerId,
        role: Role,
        /// Fellow mafia members; empty for every other role.
        teammates: Vec<PlayerId>,
    },
    RoleConfirmed {
        player_id: PlayerId,
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
        player_id: PlayerId,
        target_id: PlayerId,
        role: Role,
    },
    InvestigationResult {
        target_id: PlayerId,
        is_mafia: bool,
    },
    VoteReceived {
        voter_id: PlayerId,
        target_id: Option<PlayerId>,
    },
    PlayerEliminated {
        player: Player,
        cause: EliminationCause,
    },
    ChatMessage(ChatMessage),
    GameOver {
        winner: Winner,
        players: Vec<Player>,
    },
    GameReset {
        players: Vec<Player>,
    },
}

/// An event paired with its audience.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    pub audience: Audience,
    pub event: RoomEvent,
}

impl Outgoing {
    pub fn room(event: RoomEvent) -> Self {
        Self {
            audience: Audience::Room,
            event,
        }
    }

    pub fn player(player_id: PlayerId, event: RoomEvent) -> Self {
        Self {
            audience: Audience::Player(player_id),
            event,
        }
    }

    pub fn mafia(event: RoomEvent) -> Self {
        Self {
            audience: Audience::Mafia,
            event,
        }
    }
}
