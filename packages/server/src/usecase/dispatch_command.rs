//! UseCase: コマンド処理
//!
//! 1 フレーム分のデコード済みコマンドを、ルームのメトロノーム操作に振り分けます。
//! `Unknown` はログに残すだけで接続はそのまま維持されます。

use std::sync::Arc;

use crate::{
    domain::{Command, RoomId},
    metronome::MetronomeHub,
};

/// コマンド処理のユースケース
pub struct DispatchCommandUseCase {
    hub: Arc<MetronomeHub>,
}

impl DispatchCommandUseCase {
    /// 新しい DispatchCommandUseCase を作成
    pub fn new(hub: Arc<MetronomeHub>) -> Self {
        Self { hub }
    }

    /// コマンドを実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - コマンドを送ったクライアントのルーム
    /// * `command` - デコード済みのコマンド
    pub async fn execute(&self, room_id: &RoomId, command: Command) {
        tracing::debug!("Dispatching '{}' for room '{}'", command.name(), room_id);
        match command {
            Command::Start { tempo, beats } => self.hub.start(room_id, tempo, beats).await,
            Command::Stop => self.hub.stop(room_id).await,
            Command::ChangeTempo { tempo } => self.hub.change_tempo(room_id, tempo).await,
            Command::ChangeBeats { beats } => self.hub.change_beats(room_id, beats).await,
            Command::RequestSync => self.hub.request_sync(room_id).await,
            Command::Unknown { action } => {
                tracing::warn!(
                    "Ignoring unknown action {:?} in room '{}'",
                    action,
                    room_id
                );
            }
        }
    }
}
