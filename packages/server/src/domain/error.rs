//! Domain layer error definitions.

use thiserror::Error;

use super::entity::{Phase, Role};

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// PlayerId validation error
    #[error("Player id cannot be empty")]
    PlayerIdEmpty,

    /// PlayerId too long error
    #[error("Player id cannot exceed {max} characters (got {actual})")]
    PlayerIdTooLong { max: usize, actual: usize },

    /// PlayerName validation error
    #[error("Player name cannot be empty")]
    PlayerNameEmpty,

    /// PlayerName too long error
    #[error("Player name cannot exceed {max} characters (got {actual})")]
    PlayerNameTooLong { max: usize, actual: usize },

    /// RoomCode invalid format error (6 characters from A-Z and 0-9)
    #[error("Room code must be 6 characters of A-Z or 0-9 (got: {0})")]
    RoomCodeInvalidFormat(String),

    /// RoomName validation error
    #[error("Room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("Room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// MaxPlayers out of range error
    #[error("Max players must be between {min} and {max} (got {actual})")]
    MaxPlayersOutOfRange { min: usize, max: usize, actual: usize },

    /// ChatText validation error
    #[error("Chat message cannot be empty")]
    ChatTextEmpty,

    /// ChatText too long error
    #[error("Chat message cannot exceed {max} characters (got {actual})")]
    ChatTextTooLong { max: usize, actual: usize },
}

/// Errors raised while validating a command against the current room state.
///
/// Every variant is reported to the sender only; the room is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Player not found in room")]
    PlayerNotFound,

    #[error("Room is full: maximum {capacity} players allowed")]
    RoomFull { capacity: usize },

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Name '{0}' is already taken in this room")]
    DuplicateName(String),

    #[error("Player id '{0}' is already in this room")]
    DuplicatePlayerId(String),

    #[error("Only the host can do that")]
    NotHost,

    #[error("Not allowed during the {0} phase")]
    WrongPhase(Phase),

    #[error("Dead players cannot act")]
    PlayerDead,

    #[error("You cannot vote for yourself")]
    SelfVote,

    #[error("Invalid target")]
    InvalidTarget,

    #[error("Your role is not {0}")]
    RoleMismatch(Role),

    #[error("The {0} role has no night action")]
    NoNightAction(Role),

    #[error("Night action already submitted")]
    ActionAlreadySubmitted,

    #[error("Need at least {min} players who are all ready")]
    NotReady { min: usize },

    #[error("Only mafia members can use the mafia chat")]
    NotMafia,

    #[error("Chat log is full: maximum {capacity} messages allowed")]
    ChatLogFull { capacity: usize },

    #[error("The host cannot kick themselves")]
    CannotKickSelf,

    #[error("Connection is already in a room")]
    AlreadyInRoom,

    #[error("Connection is not bound to this player")]
    NotYourPlayer,
}

/// Errors raised by a RoomRepository implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Could not generate a unique room code")]
    CodeSpaceExhausted,
}
