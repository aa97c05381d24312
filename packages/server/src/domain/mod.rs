//! Domain layer for the Mafia room coordinator.
//!
//! This module contains the game rules and room state machine, independent
//! of transport, DTOs, and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
mod game;
pub mod repository;
pub mod rules;
pub mod settings;
pub mod value_object;

pub use entity::{
    ChatMessage, Departure, EliminationCause, NightAction, Phase, Player, Role, Room, Winner,
};
pub use error::{RepositoryError, RoomError, ValueObjectError};
pub use event::{Audience, Outgoing, RoomEvent};
pub use factory::RoomCodeFactory;
pub use repository::{RoomHandle, RoomRepository};
pub use settings::{GameConfig, PhaseDurations, RoleSet};
pub use value_object::{
    ChatText, ConnectionId, MaxPlayers, PlayerId, PlayerName, RoomCode, RoomName, Timestamp,
};
