//! Mafia game room and phase coordinator.
//!
//! Players connect over WebSocket, gather in rooms identified by a short
//! code, and play through role assignment, night, day, voting, and
//! elimination phases. The server is the single authority over room state
//! and decides what each connection is allowed to see.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run;
