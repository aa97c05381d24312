//! WebSocket and HTTP front end of the Mafia game server.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{router, run, serve};
pub use signal::shutdown_signal;
