//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 最後のクライアントが抜けたときのルームの後片付け
//!
//! ### どのような状況を想定しているか
//! - 正常系：他のメンバーが残るルームからの切断
//! - 正常系：最後のメンバーの切断（状態とスケジュールが消える）
//! - エッジケース：二重の切断（2 回目は no-op）

use std::sync::Arc;

use crate::{domain::ConnectionId, metronome::MetronomeHub};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    hub: Arc<MetronomeHub>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(hub: Arc<MetronomeHub>) -> Self {
        Self { hub }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// 登録されていたクライアントを解除した場合は `true`
    pub async fn execute(&self, connection_id: ConnectionId) -> bool {
        self.hub.unregister(connection_id).await
    }
}
