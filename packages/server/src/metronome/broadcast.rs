//! Broadcast Engine
//!
//! Fan-out of one state message to a set of clients. Every send is attempted
//! independently and bounded by a timeout, so one unresponsive peer never
//! delays delivery to the others.

use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;

use crate::domain::{ConnectionId, MessagePushError, MetronomeState};

use super::registry::Client;

/// Send `state` to one client, failing with `Timeout` if the sink does not
/// complete within `send_timeout`.
pub async fn deliver(
    client: &Client,
    state: &MetronomeState,
    send_timeout: Duration,
) -> Result<(), MessagePushError> {
    match tokio::time::timeout(send_timeout, client.sink().send_state(state)).await {
        Ok(result) => result,
        Err(_) => Err(MessagePushError::Timeout(
            u64::try_from(send_timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}

/// Send `state` to every client concurrently and return the connections
/// whose send failed.
pub async fn fan_out<'a, I>(
    clients: I,
    state: &MetronomeState,
    send_timeout: Duration,
) -> Vec<ConnectionId>
where
    I: IntoIterator<Item = &'a Arc<Client>>,
{
    let sends = clients.into_iter().map(|client| async move {
        let result = deliver(client, state, send_timeout).await;
        (client, result)
    });

    join_all(sends)
        .await
        .into_iter()
        .filter_map(|(client, result)| match result {
            Ok(()) => {
                tracing::debug!(
                    "Pushed state of room '{}' to client '{}'",
                    state.room_id,
                    client.client_id
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to push state of room '{}' to client '{}' ({}): {}",
                    state.room_id,
                    client.client_id,
                    client.connection_id,
                    e
                );
                Some(client.connection_id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Beats, ClientId, ConnectionSink, RoomId, Tempo, Timestamp};
    use crate::metronome::testing::{FailingSink, RecordingSink, StalledSink};

    fn create_test_client(user: &str, sink: Arc<dyn ConnectionSink>) -> Arc<Client> {
        Arc::new(Client::new(
            ClientId::new(user.to_string()).unwrap(),
            RoomId::new("r1".to_string()).unwrap(),
            sink,
        ))
    }

    fn create_test_state() -> MetronomeState {
        MetronomeState::started(
            RoomId::new("r1".to_string()).unwrap(),
            Tempo::default(),
            Beats::default(),
            Timestamp::new(0),
        )
    }

    #[tokio::test]
    async fn test_deliver_times_out_on_stalled_sink() {
        // テスト項目: 応答しないクライアントへの送信はタイムアウトで失敗する
        // given (前提条件):
        let client = create_test_client("slow", Arc::new(StalledSink));

        // when (操作):
        let result = deliver(&client, &create_test_state(), Duration::from_millis(20)).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::Timeout(20)));
    }

    #[tokio::test]
    async fn test_fan_out_isolates_failures() {
        // テスト項目: 失敗・停止したクライアントがいても他のクライアントには届く
        // given (前提条件):
        let good = RecordingSink::new();
        let clients = vec![
            create_test_client("alice", good.clone()),
            create_test_client("bob", Arc::new(FailingSink)),
            create_test_client("carol", Arc::new(StalledSink)),
        ];

        // when (操作):
        let failed = fan_out(&clients, &create_test_state(), Duration::from_millis(50)).await;

        // then (期待する結果):
        assert_eq!(failed.len(), 2);
        assert!(failed.contains(&clients[1].connection_id));
        assert!(failed.contains(&clients[2].connection_id));
        assert_eq!(good.received(), vec![create_test_state()]);
    }

    #[tokio::test]
    async fn test_fan_out_empty() {
        // テスト項目: 空のクライアント集合でもエラーにならない
        // when (操作):
        let failed = fan_out(
            std::iter::empty::<&Arc<Client>>(),
            &create_test_state(),
            Duration::from_millis(10),
        )
        .await;

        // then (期待する結果):
        assert!(failed.is_empty());
    }
}
