//! HTTP API endpoint handlers.
//!
//! Read-only views of the Room Store. Roles are never exposed here.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mafia_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomCode,
    infrastructure::dto::http::{PlayerSummaryDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "rooms": state.repository.count().await,
        "connections": state.registry.count().await,
    }))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let mut summaries = Vec::new();
    for handle in state.repository.list().await {
        let room = handle.lock().await;
        if room.closed {
            continue;
        }
        summaries.push(RoomSummaryDto {
            code: room.code.to_string(),
            name: room.name.as_str().to_string(),
            player_count: room.players.len(),
            max_players: room.max_players,
            phase: room.phase,
            has_password: room.password.is_some(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        });
    }
    summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.code.cmp(&b.code)));
    Json(summaries)
}

/// Get room detail by code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let code = RoomCode::try_from(code).map_err(|_| StatusCode::NOT_FOUND)?;
    let handle = state
        .repository
        .get(&code)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let room = handle.lock().await;
    if room.closed {
        return Err(StatusCode::NOT_FOUND);
    }

    let room_detail = RoomDetailDto {
        code: room.code.to_string(),
        name: room.name.as_str().to_string(),
        max_players: room.max_players,
        phase: room.phase,
        day_count: room.day_count,
        night_count: room.night_count,
        players: room
            .players
            .iter()
            .map(|p| PlayerSummaryDto {
                id: p.id.to_string(),
                name: p.name.to_string(),
                is_host: p.is_host,
                is_ready: p.is_ready,
                is_alive: p.is_alive,
            })
            .collect(),
        chat_messages: room.public_chat().count(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    };

    Ok(Json(room_detail))
}
