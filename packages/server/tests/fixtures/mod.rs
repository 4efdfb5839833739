//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use metrosync_server::{
    config::ServerConfig, infrastructure::repository::InMemoryRoomRepository,
    metronome::MetronomeHub, ui::Server,
};
use metrosync_shared::time::SystemClock;
use serde_json::Value;
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a single frame before giving up
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// In-process server bound to an ephemeral port
pub struct TestServer {
    pub port: u16,
    pub hub: Arc<MetronomeHub>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server with a short sync interval
    pub async fn start() -> Self {
        Self::start_with(ServerConfig {
            sync_interval: Duration::from_millis(200),
            send_timeout: Duration::from_millis(500),
            ..ServerConfig::default()
        })
        .await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();

        let server = Server::new(
            config,
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(SystemClock),
        );
        let hub = server.hub();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            server
                .serve(listener, shutdown)
                .await
                .expect("Test server failed");
        });

        TestServer {
            port,
            hub,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn ws_url(&self, room: &str, user: &str) -> String {
        format!("ws://127.0.0.1:{}/ws/{}?userId={}", self.port, room, user)
    }

    /// Open a WebSocket connection to `room` as `user`
    pub async fn connect(&self, room: &str, user: &str) -> WsStream {
        let (stream, _) = tokio_tungstenite::connect_async(self.ws_url(room, user))
            .await
            .expect("Failed to connect");
        stream
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Send a JSON command frame
pub async fn send_json(ws: &mut WsStream, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next text frame as JSON, `None` on timeout or close
pub async fn recv_json(ws: &mut WsStream) -> Option<Value> {
    recv_json_within(ws, RECV_TIMEOUT).await
}

pub async fn recv_json_within(ws: &mut WsStream, timeout: Duration) -> Option<Value> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let frame = tokio::time::timeout_at(deadline, ws.next()).await.ok()??;
        match frame.ok()? {
            Message::Text(text) => return serde_json::from_str(&text).ok(),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}

/// Wait until the connection is closed by the server
pub async fn wait_closed(ws: &mut WsStream) -> bool {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return false,
            Ok(None) | Ok(Some(Err(_))) | Ok(Some(Ok(Message::Close(_)))) => return true,
            Ok(Some(Ok(_))) => continue,
        }
    }
}
