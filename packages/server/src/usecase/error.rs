//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Room 作成のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateRoomError {
    #[error("Failed to generate room id: {0}")]
    IdGeneration(#[from] ValueObjectError),

    #[error("Could not find a free room id after {0} attempts")]
    IdExhausted(usize),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Room 取得のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GetRoomError {
    #[error("Invalid room ID format")]
    InvalidRoomId,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// メトロノーム状態取得のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GetMetronomeStateError {
    #[error("Invalid room ID format")]
    InvalidRoomId,

    #[error("Metronome state not found")]
    NotFound,
}
