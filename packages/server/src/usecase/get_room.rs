//! UseCase: Room 取得処理

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

use super::error::GetRoomError;

/// Room 取得のユースケース
pub struct GetRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomUseCase {
    /// 新しい GetRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Room 取得を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - パスで受け取った文字列。8 文字の short id 形式でなければ `InvalidRoomId`
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomError> {
        let room_id = RoomId::try_from(room_id)
            .ok()
            .filter(RoomId::is_short_id)
            .ok_or(GetRoomError::InvalidRoomId)?;

        self.repository
            .get_room(&room_id)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomNotFound(_) => GetRoomError::RoomNotFound,
                other => GetRoomError::Repository(other),
            })
    }
}
