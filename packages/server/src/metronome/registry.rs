//! Client Registry
//!
//! 接続中のクライアントを保持するコアの葉のデータ構造です。
//!
//! - ルームごとのコレクションは持たず、ルームのメンバーは常にこのマップを
//!   room_id でフィルタして求める
//! - register / unregister は排他ロック、broadcast は共有ロックで実行する
//! - 空になったルームの後片付けは排他ロックを保持したまま行うため、
//!   同時に行われた register が片付け途中のルームを観測することはない

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::RwLock;

use crate::domain::{ClientId, ConnectionId, ConnectionSink, MetronomeState, RoomId};

use super::broadcast;

/// 接続中の 1 クライアント
pub struct Client {
    pub connection_id: ConnectionId,
    pub client_id: ClientId,
    pub room_id: RoomId,
    sink: Arc<dyn ConnectionSink>,
}

impl Client {
    pub fn new(client_id: ClientId, room_id: RoomId, sink: Arc<dyn ConnectionSink>) -> Self {
        Self {
            connection_id: ConnectionId::generate(),
            client_id,
            room_id,
            sink,
        }
    }

    pub fn sink(&self) -> &dyn ConnectionSink {
        self.sink.as_ref()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connection_id", &self.connection_id)
            .field("client_id", &self.client_id)
            .field("room_id", &self.room_id)
            .finish_non_exhaustive()
    }
}

/// 接続中クライアントの集合
#[derive(Default)]
pub struct ClientRegistry {
    /// Key: ConnectionId（同じ user id の接続が複数あっても別エントリ）
    clients: RwLock<HashMap<ConnectionId, Arc<Client>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// クライアントを登録する
    pub async fn register(&self, client: Arc<Client>) {
        let mut clients = self.clients.write().await;
        tracing::debug!(
            "Client '{}' ({}) registered to room '{}'",
            client.client_id,
            client.connection_id,
            client.room_id
        );
        clients.insert(client.connection_id, client);
    }

    /// クライアントを登録解除する（存在しなければ何もしない）
    ///
    /// 解除後にそのルームのメンバーが 0 になった場合、排他ロックを保持したまま
    /// `on_empty` を呼ぶ。
    pub async fn unregister<F>(&self, connection_id: ConnectionId, on_empty: F) -> Option<Arc<Client>>
    where
        F: FnOnce(&RoomId),
    {
        let mut clients = self.clients.write().await;
        let removed = clients.remove(&connection_id)?;
        tracing::debug!(
            "Client '{}' ({}) unregistered from room '{}'",
            removed.client_id,
            removed.connection_id,
            removed.room_id
        );

        if count_in(&clients, &removed.room_id) == 0 {
            on_empty(&removed.room_id);
        }
        Some(removed)
    }

    /// ルームのメンバーが 0 の場合に限り、排他ロックを保持したまま `on_empty` を呼ぶ
    ///
    /// `on_empty` が呼ばれた場合は `true` を返す。
    pub async fn cleanup_if_empty<F>(&self, room_id: &RoomId, on_empty: F) -> bool
    where
        F: FnOnce(&RoomId),
    {
        let clients = self.clients.write().await;
        if count_in(&clients, room_id) == 0 {
            on_empty(room_id);
            true
        } else {
            false
        }
    }

    /// ルームの全クライアントに状態を送信する
    ///
    /// 送信に失敗したクライアントの ConnectionId を返す。
    /// 失敗したクライアントの登録解除は呼び出し側が行う。
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        state: &MetronomeState,
        send_timeout: Duration,
    ) -> Vec<ConnectionId> {
        let clients = self.clients.read().await;
        let members = clients.values().filter(|c| &c.room_id == room_id);
        broadcast::fan_out(members, state, send_timeout).await
    }

    /// ルームに所属するクライアント数
    pub async fn count_in_room(&self, room_id: &RoomId) -> usize {
        let clients = self.clients.read().await;
        count_in(&clients, room_id)
    }

    /// 全クライアント数
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

fn count_in(clients: &HashMap<ConnectionId, Arc<Client>>, room_id: &RoomId) -> usize {
    clients.values().filter(|c| &c.room_id == room_id).count()
}
