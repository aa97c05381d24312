//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルームコードをキーとする HashMap をインメモリ DB として使用します。
//!
//! マップ全体のロックは検索・挿入・削除の間だけ保持し、
//! ルーム単位の処理は各 [`RoomHandle`] のロックで直列化します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    RepositoryError, Room, RoomCode, RoomCodeFactory, RoomHandle, RoomRepository,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomCode, RoomHandle>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(
        &self,
        build: Box<dyn FnOnce(RoomCode) -> Room + Send>,
    ) -> Result<RoomHandle, RepositoryError> {
        let mut rooms = self.rooms.write().await;
        let code = RoomCodeFactory::generate_unique(&mut rand::rng(), |code| {
            rooms.contains_key(code)
        })
        .ok_or(RepositoryError::CodeSpaceExhausted)?;

        let handle = Arc::new(Mutex::new(build(code.clone())));
        rooms.insert(code, handle.clone());
        Ok(handle)
    }

    async fn get(&self, code: &RoomCode) -> Result<RoomHandle, RepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(code.to_string()))
    }

    async fn delete(&self, code: &RoomCode) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.write().await;
        rooms
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::RoomNotFound(code.to_string()))
    }

    async fn list(&self) -> Vec<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}
