//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::Phase;

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub code: String,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub phase: Phase,
    pub has_password: bool,
    pub created_at: String, // ISO 8601
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub code: String,
    pub name: String,
    pub max_players: usize,
    pub phase: Phase,
    pub day_count: u32,
    pub night_count: u32,
    pub players: Vec<PlayerSummaryDto>,
    /// Public chat messages only
    pub chat_messages: usize,
    pub created_at: String, // ISO 8601
}

/// Player entry for room detail endpoint (no roles)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummaryDto {
    pub id: String,
    pub name: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_alive: bool,
}
