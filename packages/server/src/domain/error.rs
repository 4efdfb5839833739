//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientId validation error
    #[error("ClientId cannot be empty")]
    ClientIdEmpty,

    /// ClientId too long error
    #[error("ClientId cannot exceed {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// Tempo outside of the accepted BPM range
    #[error("Tempo must be between {min} and {max} BPM (got {actual})")]
    TempoOutOfRange { min: u32, max: u32, actual: u32 },

    /// Beats outside of the accepted beats-per-measure range
    #[error("Beats must be between {min} and {max} (got {actual})")]
    BeatsOutOfRange { min: u32, max: u32, actual: u32 },
}

/// Errors related to room storage
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Room not found
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Room with the same id already exists
    #[error("Room already exists: {0}")]
    AlreadyExists(String),
}

/// Errors reported by a connection sink when a push cannot be delivered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// The peer is gone (socket closed, writer task ended)
    #[error("Connection closed")]
    ConnectionClosed,

    /// The bounded outbound queue of the peer is full
    #[error("Outbound queue is full")]
    QueueFull,

    /// The push did not complete within the send timeout
    #[error("Push timed out after {0} ms")]
    Timeout(u64),

    /// The message could not be encoded
    #[error("Failed to serialize message: {0}")]
    Serialization(String),
}
