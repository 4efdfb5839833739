//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use metrosync_server::infrastructure::dto::websocket::{CommandMessage, MetronomeStateMessage};
use metrosync_shared::time::get_unix_timestamp_millis;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use url::Url;

use crate::{
    domain::{beat_position, clock_offset, parse_command},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Build the room endpoint from the server base URL.
///
/// Room and user ids are percent-encoded into the path and query.
pub fn room_url(base_url: &str, room_id: &str, user_id: &str) -> Result<String, ClientError> {
    let invalid = || ClientError::InvalidUrl(base_url.to_string());
    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(["ws", room_id]);
    url.query_pairs_mut().clear().append_pair("userId", user_id);
    Ok(url.into())
}

/// Run the WebSocket client session
pub async fn run_client_session(
    base_url: &str,
    room_id: &str,
    user_id: &str,
) -> Result<(), ClientError> {
    let url = room_url(base_url, room_id, user_id)?;

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        // 4xx はハンドシェイク拒否（不正な ID や Origin）
        Err(WsError::Http(response)) if response.status().is_client_error() => {
            return Err(ClientError::Rejected(response.status().as_u16()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to metronome server!");
    print!("{}", MessageFormatter::format_connected(room_id, user_id));

    let (mut write, mut read) = ws_stream.split();

    let user_id_for_read = user_id.to_string();

    // Spawn a task to handle incoming state pushes
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let received_at = get_unix_timestamp_millis();
                    let formatted = match serde_json::from_str::<MetronomeStateMessage>(&text) {
                        Ok(state) => {
                            let offset = clock_offset(state.server_time, received_at);
                            let position = beat_position(&state, received_at, offset);
                            MessageFormatter::format_state(&state, offset, position)
                        }
                        // If parsing fails, display as raw text
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    let user_id = user_id.to_string();
    let user_id_for_prompt = user_id.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn stdin lines into commands
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("\n{}\n{}", e, MessageFormatter::format_help());
                    redisplay_prompt(&user_id);
                    continue;
                }
            };

            let json = match serde_json::to_string(&CommandMessage::from(&command)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize command: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send command: {}", e);
                write_error = true;
                break;
            }

            let formatted =
                MessageFormatter::format_sent_confirmation(command.name(), get_unix_timestamp_millis());
            print!("\n{}", formatted);
            redisplay_prompt(&user_id);
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
