//! Repository trait 定義
//!
//! REST API が扱う Room レコードへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! メトロノームの再生状態はここには含まれません。再生状態は
//! `metronome` モジュールがメモリ上でのみ保持します。

use async_trait::async_trait;

use super::{RepositoryError, Room, RoomId};

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を保存する。同じ ID が既に存在する場合は `AlreadyExists`
    async fn create_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// Room を取得する。存在しない場合は `RoomNotFound`
    async fn get_room(&self, id: &RoomId) -> Result<Room, RepositoryError>;
}
