//! WebSocket を使った ConnectionSink 実装
//!
//! ## 責務
//!
//! - メトロノーム状態を JSON にシリアライズし、クライアントごとの送信キューに積む
//!
//! ## 設計ノート
//!
//! WebSocket の生成と書き込みは UI 層（`ui/handler/websocket.rs`）の writer タスクが行います。
//! この実装は有界キューの `Sender` だけを持ち、キューが満杯・クローズ済みなら即座に
//! 失敗を返します（送信側がブロックすることはない）。

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{
    domain::{ConnectionSink, MessagePushError, MetronomeState},
    infrastructure::dto::websocket::MetronomeStateMessage,
};

/// 1 接続分の WebSocket 送信口
pub struct WebSocketConnectionSink {
    /// writer タスクへの有界キュー
    outbound: mpsc::Sender<String>,
}

impl WebSocketConnectionSink {
    /// 新しい WebSocketConnectionSink を作成
    ///
    /// # 引数
    ///
    /// - `outbound`: writer タスクが受信する有界キューの送信側
    pub fn new(outbound: mpsc::Sender<String>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl ConnectionSink for WebSocketConnectionSink {
    async fn send_state(&self, state: &MetronomeState) -> Result<(), MessagePushError> {
        let message = MetronomeStateMessage::from(state);
        let json = serde_json::to_string(&message)
            .map_err(|e| MessagePushError::Serialization(e.to_string()))?;

        self.outbound.try_send(json).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull,
            TrySendError::Closed(_) => MessagePushError::ConnectionClosed,
        })
    }
}
