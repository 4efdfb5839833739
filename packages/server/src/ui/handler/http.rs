//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{CreateRoomDto, ErrorDto, HealthDto, RoomDto},
        websocket::MetronomeStateMessage,
    },
    ui::state::AppState,
    usecase::{GetMetronomeStateError, GetRoomError},
};

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorDto::new(message)))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Create a new room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<CreateRoomDto>), ApiError> {
    match state.create_room_usecase.execute().await {
        Ok(room) => Ok((
            StatusCode::CREATED,
            Json(CreateRoomDto {
                uuid: room.id.into_string(),
            }),
        )),
        Err(e) => {
            tracing::error!("Failed to create room: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create room",
            ))
        }
    }
}

/// Get a room by its short id
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, ApiError> {
    match state.get_room_usecase.execute(room_id).await {
        // Domain Model から DTO への変換
        Ok(room) => Ok(Json(RoomDto::from(&room))),
        Err(GetRoomError::InvalidRoomId) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid room ID format",
        )),
        Err(GetRoomError::RoomNotFound) => {
            Err(api_error(StatusCode::NOT_FOUND, "Room not found"))
        }
        Err(GetRoomError::Repository(e)) => {
            tracing::error!("Failed to get room: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}

/// Debug endpoint: current metronome snapshot of a room
pub async fn get_metronome_state(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<MetronomeStateMessage>, ApiError> {
    match state.get_metronome_state_usecase.execute(room_id) {
        Ok(snapshot) => Ok(Json(MetronomeStateMessage::from(&snapshot))),
        Err(GetMetronomeStateError::InvalidRoomId) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid room ID format",
        )),
        Err(GetMetronomeStateError::NotFound) => Err(api_error(
            StatusCode::NOT_FOUND,
            "Metronome state not found",
        )),
    }
}
