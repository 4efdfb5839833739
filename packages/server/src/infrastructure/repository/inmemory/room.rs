//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセスを再起動すると Room は失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    /// Key: RoomId
    rooms: RwLock<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::AlreadyExists(room.id.into_string()));
        }
        tracing::debug!("Room '{}' stored", room.id);
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn get_room(&self, id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(id.as_str().to_string()))
    }
}
