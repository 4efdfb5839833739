//! ConnectionSink trait 定義
//!
//! コアがクライアントへ状態を送るためのインターフェースです。
//! WebSocket などの具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{MessagePushError, MetronomeState};

/// 1 接続分の送信口
///
/// - 送信に成功したか失敗したかだけをコアに返す
/// - 失敗したクライアントはコア側で登録解除される
#[async_trait]
pub trait ConnectionSink: Send + Sync {
    /// メトロノーム状態を 1 件送信する
    async fn send_state(&self, state: &MetronomeState) -> Result<(), MessagePushError>;
}
