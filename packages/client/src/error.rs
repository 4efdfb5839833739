//! Error types for the metronome client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the WebSocket handshake (bad room/user id, origin)
    #[error("Server rejected the connection with HTTP {0}")]
    Rejected(u16),

    /// `--url` is not a usable WebSocket base URL
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A line typed on stdin is not a valid command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
