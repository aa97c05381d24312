//! Room Store abstraction.
//!
//! The domain layer defines the trait; infrastructure provides the
//! implementation (dependency inversion).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{entity::Room, error::RepositoryError, value_object::RoomCode};

/// A room behind its own lock. Holding the lock is the per-room
/// serialization boundary: one command's validation, mutation, and event
/// delivery happen under a single acquisition.
pub type RoomHandle = Arc<Mutex<Room>>;

/// Exclusive owner of every live room.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Store a new room built by `build` under a freshly generated code that
    /// does not collide with any live room.
    async fn create(
        &self,
        build: Box<dyn FnOnce(RoomCode) -> Room + Send>,
    ) -> Result<RoomHandle, RepositoryError>;

    /// Look up a live room.
    async fn get(&self, code: &RoomCode) -> Result<RoomHandle, RepositoryError>;

    /// Remove a room. The caller must hold the room lock and mark it closed.
    async fn delete(&self, code: &RoomCode) -> Result<(), RepositoryError>;

    /// Every live room, in no particular order.
    async fn list(&self) -> Vec<RoomHandle>;

    async fn count(&self) -> usize;
}
