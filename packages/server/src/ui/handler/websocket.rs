//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::ORIGIN},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, Command, RoomId},
    infrastructure::{connection::WebSocketConnectionSink, dto::websocket::CommandMessage},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_uuid): Path<String>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    // Origin がない（ブラウザ以外の）接続は許可する
    if let Some(origin) = headers.get(ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|origin| state.config.is_origin_allowed(origin))
            .unwrap_or(false);
        if !allowed {
            tracing::warn!("Rejected WebSocket connection from origin {:?}", origin);
            return Err(StatusCode::FORBIDDEN);
        }
    }

    // Convert String -> RoomId / ClientId (Domain Model)
    let room_id = match RoomId::try_from(room_uuid) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let client_id = match ClientId::try_from(query.user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid userId: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    tracing::info!(
        "New WebSocket connection: user '{}' (room: '{}')",
        client_id,
        room_id
    );
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, room_id)))
}

/// Spawns a task that drains the client's outbound queue into the WebSocket sink.
///
/// Each write is bounded by `send_timeout`; a failed or timed-out write ends
/// the task, which in turn ends the connection.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    send_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(send_timeout, sender.send(Message::Text(msg.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("WebSocket write failed: {}", e);
                    break;
                }
                Err(_) => {
                    tracing::warn!("WebSocket write timed out after {:?}", send_timeout);
                    break;
                }
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    room_id: RoomId,
) {
    let (sender, mut receiver) = socket.split();

    // Outbound: bounded queue -> writer task -> socket
    let (tx, rx) = mpsc::channel(state.config.outbound_queue);
    let mut send_task = pusher_loop(rx, sender, state.config.send_timeout);

    // Register and push the current snapshot (if any) to this client
    let client = state
        .connect_client_usecase
        .execute(
            client_id,
            room_id.clone(),
            Arc::new(WebSocketConnectionSink::new(tx)),
        )
        .await;

    let dispatch = state.dispatch_command_usecase.clone();
    let user = client.client_id.clone();

    // Spawn a task to receive commands from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket read error from '{}': {}", user, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let command = match serde_json::from_str::<CommandMessage>(&text) {
                        Ok(msg) => Command::from(msg),
                        Err(e) => {
                            tracing::warn!(
                                "Failed to decode command from '{}', closing: {}",
                                user,
                                e
                            );
                            break;
                        }
                    };
                    tracing::info!("Received '{}' from '{}'", command.name(), user);
                    dispatch.execute(&room_id, command).await;
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", user);
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", user);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_client_usecase
        .execute(client.connection_id)
        .await;
    tracing::info!(
        "Client '{}' disconnected from room '{}'",
        client.client_id,
        client.room_id
    );
}
