//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    error::ValueObjectError,
    settings::{DEFAULT_MAX_PLAYERS, MAX_PLAYERS, MIN_PLAYERS},
};

/// Symbols a room code is drawn from.
pub const ROOM_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every room code.
pub const ROOM_CODE_LENGTH: usize = 6;

const MAX_ID_LEN: usize = 100;
const MAX_NAME_LEN: usize = 32;
const MAX_ROOM_NAME_LEN: usize = 64;
const MAX_CHAT_LEN: usize = 1000;

/// Player identifier value object.
///
/// Opaque and client-chosen; unique within a room. Ordering is used for
/// deterministic tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new PlayerId.
    ///
    /// # Arguments
    ///
    /// * `id` - The player identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the PlayerId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::PlayerIdEmpty);
        }
        let len = id.len();
        if len > MAX_ID_LEN {
            return Err(ValueObjectError::PlayerIdTooLong {
                max: MAX_ID_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a player, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::PlayerNameEmpty);
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValueObjectError::PlayerNameTooLong {
                max: MAX_NAME_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names collide case-insensitively.
    pub fn collides_with(&self, other: &PlayerName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }

    /// Upper-cased first character, used when a client sends no avatar.
    pub fn default_avatar(&self) -> String {
        self.0
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code value object.
///
/// Six characters from [`ROOM_CODE_ALPHABET`]. Input is upper-cased before
/// validation so codes typed in lowercase still match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Create a new RoomCode.
    ///
    /// # Arguments
    ///
    /// * `code` - The room code string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomCode or an error if the format is invalid
    pub fn new(code: String) -> Result<Self, ValueObjectError> {
        let normalized = code.trim().to_ascii_uppercase();
        let valid = normalized.len() == ROOM_CODE_LENGTH
            && normalized.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));
        if !valid {
            return Err(ValueObjectError::RoomCodeInvalidFormat(code));
        }
        Ok(Self(normalized))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomCode> for String {
    fn from(value: RoomCode) -> Self {
        value.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomName(String);

impl RoomName {
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.chars().count();
        if len > MAX_ROOM_NAME_LEN {
            return Err(ValueObjectError::RoomNameTooLong {
                max: MAX_ROOM_NAME_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomName> for String {
    fn from(value: RoomName) -> Self {
        value.0
    }
}

/// Seat limit of a room, within 4..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct MaxPlayers(usize);

impl MaxPlayers {
    pub fn new(value: usize) -> Result<Self, ValueObjectError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&value) {
            return Err(ValueObjectError::MaxPlayersOutOfRange {
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for MaxPlayers {
    fn default() -> Self {
        Self(DEFAULT_MAX_PLAYERS)
    }
}

impl TryFrom<usize> for MaxPlayers {
    type Error = ValueObjectError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaxPlayers> for usize {
    fn from(value: MaxPlayers) -> Self {
        value.0
    }
}

/// Chat message text, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatText(String);

impl ChatText {
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ValueObjectError::ChatTextEmpty);
        }
        let len = text.chars().count();
        if len > MAX_CHAT_LEN {
            return Err(ValueObjectError::ChatTextTooLong {
                max: MAX_CHAT_LEN,
                actual: len,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChatText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChatText> for String {
    fn from(value: ChatText) -> Self {
        value.0
    }
}

/// Identifier of one live transport connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}
