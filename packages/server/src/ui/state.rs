//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    domain::{GameConfig, RoomRepository},
    infrastructure::{connection::ConnectionRegistry, repository::InMemoryRoomRepository},
    usecase::RoomCoordinator,
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Live WebSocket connections and their room bindings
    pub registry: Arc<ConnectionRegistry>,
    pub coordinator: Arc<RoomCoordinator>,
}

impl AppState {
    /// Wire up in-memory storage and a coordinator for `config`.
    pub fn new(config: GameConfig) -> Arc<Self> {
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let coordinator = RoomCoordinator::new(repository.clone(), registry.clone(), config);
        Arc::new(Self {
            repository,
            registry,
            coordinator,
        })
    }
}
