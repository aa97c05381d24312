//! Infrastructure layer: room storage, connection tracking, timers, and
//! wire DTOs.

pub mod connection;
pub mod dto;
pub mod repository;
pub mod timer;
