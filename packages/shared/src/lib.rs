//! Shared utilities for the Mafia room coordinator.
//!
//! Logger initialisation and JST time helpers used by the server binary and tests.

pub mod logger;
pub mod time;
