//! UseCase: Room 作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - ID 重複時の再生成とリトライ上限
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 回目で作成成功
//! - 異常系：ID が 3 回続けて重複（IdExhausted）
//! - エッジケース：1 回重複した後に成功

use std::sync::Arc;

use metrosync_shared::time::Clock;

use crate::domain::{RepositoryError, Room, RoomIdFactory, RoomRepository, Timestamp};

use super::error::CreateRoomError;

/// ID 重複時に再生成する最大回数
const MAX_ATTEMPTS: usize = 3;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Room 作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成された Room
    /// * `Err(CreateRoomError)` - 作成失敗
    pub async fn execute(&self) -> Result<Room, CreateRoomError> {
        let now = Timestamp::new(self.clock.now_millis());

        for attempt in 1..=MAX_ATTEMPTS {
            let room = Room::new(RoomIdFactory::generate()?, now);
            match self.repository.create_room(room.clone()).await {
                Ok(()) => {
                    tracing::info!("Room '{}' created", room.id);
                    return Ok(room);
                }
                Err(RepositoryError::AlreadyExists(id)) => {
                    tracing::warn!(
                        "Room id '{}' already taken (attempt {}/{})",
                        id,
                        attempt,
                        MAX_ATTEMPTS
                    );
                }
                Err(e) => return Err(CreateRoomError::Repository(e)),
            }
        }

        Err(CreateRoomError::IdExhausted(MAX_ATTEMPTS))
    }
}
