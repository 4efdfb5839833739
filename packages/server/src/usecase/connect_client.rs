//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - クライアントの登録と、途中参加者への現在状態の送信
//!
//! ### なぜこのテストが必要か
//! - 途中参加者が次の同期 tick を待たずに状態を受け取ることを保証
//! - 同じ user id の複数接続が別々に登録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：状態のないルームへの接続（何も送られない）
//! - 正常系：再生中のルームへの途中参加
//! - エッジケース：同じ user id での二重接続

use std::sync::Arc;

use crate::{
    domain::{ClientId, ConnectionSink, RoomId},
    metronome::{Client, MetronomeHub},
};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    hub: Arc<MetronomeHub>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(hub: Arc<MetronomeHub>) -> Self {
        Self { hub }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するユーザーの ID
    /// * `room_id` - 参加するルームの ID
    /// * `sink` - クライアントへの送信口
    ///
    /// # Returns
    ///
    /// 登録されたクライアント。切断時に `DisconnectClientUseCase` へ渡す
    pub async fn execute(
        &self,
        client_id: ClientId,
        room_id: RoomId,
        sink: Arc<dyn ConnectionSink>,
    ) -> Arc<Client> {
        // 1. クライアントを作成して登録
        let client = self.hub.new_client(client_id, room_id, sink);
        self.hub.register(client.clone()).await;

        // 2. 現在の状態があれば、この接続にだけ送る
        self.hub.send_current_snapshot(&client).await;

        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Beats, Tempo},
        metronome::{HubConfig, testing::RecordingSink},
    };
    use metrosync_shared::time::FixedClock;

    fn create_test_usecase() -> (ConnectClientUseCase, Arc<MetronomeHub>) {
        let hub = MetronomeHub::new(HubConfig::default(), Arc::new(FixedClock::new(10_000)));
        (ConnectClientUseCase::new(hub.clone()), hub)
    }

    fn room() -> RoomId {
        RoomId::new("r1".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_connect_to_idle_room_sends_nothing() {
        // テスト項目: 状態のないルームへの接続では何も送られない
        // given (前提条件):
        let (usecase, hub) = create_test_usecase();
        let sink = RecordingSink::new();

        // when (操作):
        usecase
            .execute(ClientId::new("alice".to_string()).unwrap(), room(), sink.clone())
            .await;

        // then (期待する結果):
        assert!(sink.received().is_empty());
        assert_eq!(hub.client_count(&room()).await, 1);
    }

    #[tokio::test]
    async fn test_connect_to_playing_room_receives_snapshot() {
        // テスト項目: 再生中のルームに参加すると現在の状態が即座に届く
        // given (前提条件):
        let (usecase, hub) = create_test_usecase();
        hub.start(&room(), Tempo::new(90).unwrap(), Beats::new(3).unwrap())
            .await;
        let sink = RecordingSink::new();

        // when (操作):
        usecase
            .execute(ClientId::new("bob".to_string()).unwrap(), room(), sink.clone())
            .await;

        // then (期待する結果):
        let received = sink.received();
        assert_eq!(received.len(), 1);
        assert!(received[0].is_playing);
        assert_eq!(received[0].tempo.value(), 90);
    }

    #[tokio::test]
    async fn test_same_user_twice_registers_two_clients() {
        // テスト項目: 同じ user id で 2 回接続すると 2 つの別クライアントになる
        // given (前提条件):
        let (usecase, hub) = create_test_usecase();
        let alice = ClientId::new("alice".to_string()).unwrap();

        // when (操作):
        let first = usecase
            .execute(alice.clone(), room(), RecordingSink::new())
            .await;
        let second = usecase.execute(alice, room(), RecordingSink::new()).await;

        // then (期待する結果):
        assert_ne!(first.connection_id, second.connection_id);
        assert_eq!(hub.client_count(&room()).await, 2);
    }
}
