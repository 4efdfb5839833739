//! Conversion logic between DTOs and domain entities.

use serde_json::Value;

use crate::domain::{Beats, Command, MetronomeState, Room, Tempo};
use crate::infrastructure::dto::{http, websocket as dto};
use metrosync_shared::time::timestamp_to_rfc3339;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::CommandMessage> for Command {
    fn from(msg: dto::CommandMessage) -> Self {
        let action = match msg.action {
            Some(Value::String(action)) => action,
            _ => return Command::Unknown { action: None },
        };

        match action.as_str() {
            dto::action::START => Command::Start {
                tempo: tempo_or_default(msg.tempo.as_ref()),
                beats: beats_or_default(msg.beats.as_ref()),
            },
            dto::action::STOP => Command::Stop,
            dto::action::CHANGE_TEMPO => Command::ChangeTempo {
                tempo: tempo_or_default(msg.tempo.as_ref()),
            },
            dto::action::CHANGE_BEATS => Command::ChangeBeats {
                beats: beats_or_default(msg.beats.as_ref()),
            },
            dto::action::REQUEST_SYNC => Command::RequestSync,
            _ => Command::Unknown {
                action: Some(action),
            },
        }
    }
}

/// Whole part of a non-negative JSON number; fractions are truncated.
fn whole_number(value: Option<&Value>) -> Option<u32> {
    let n = value?.as_f64()?;
    if !n.is_finite() || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n.trunc() as u32)
}

fn tempo_or_default(value: Option<&Value>) -> Tempo {
    whole_number(value)
        .and_then(|bpm| Tempo::new(bpm).ok())
        .unwrap_or_default()
}

fn beats_or_default(value: Option<&Value>) -> Beats {
    whole_number(value)
        .and_then(|beats| Beats::new(beats).ok())
        .unwrap_or_default()
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&MetronomeState> for dto::MetronomeStateMessage {
    fn from(model: &MetronomeState) -> Self {
        Self {
            is_playing: model.is_playing,
            tempo: model.tempo.value(),
            beats: model.beats.value(),
            start_time: model.start_time.value(),
            server_time: model.server_time.value(),
            room_uuid: model.room_id.as_str().to_string(),
            r#type: dto::MessageType::MetronomeState,
        }
    }
}

impl From<&Command> for dto::CommandMessage {
    fn from(command: &Command) -> Self {
        let action = |name: &str| Some(Value::String(name.to_string()));
        match command {
            Command::Start { tempo, beats } => Self {
                action: action(dto::action::START),
                tempo: Some(Value::from(tempo.value())),
                beats: Some(Value::from(beats.value())),
            },
            Command::Stop => Self {
                action: action(dto::action::STOP),
                ..Self::default()
            },
            Command::ChangeTempo { tempo } => Self {
                action: action(dto::action::CHANGE_TEMPO),
                tempo: Some(Value::from(tempo.value())),
                beats: None,
            },
            Command::ChangeBeats { beats } => Self {
                action: action(dto::action::CHANGE_BEATS),
                tempo: None,
                beats: Some(Value::from(beats.value())),
            },
            Command::RequestSync => Self {
                action: action(dto::action::REQUEST_SYNC),
                ..Self::default()
            },
            Command::Unknown { action: name } => Self {
                action: name.as_deref().and_then(action),
                ..Self::default()
            },
        }
    }
}

impl From<&Room> for http::RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            uuid: room.id.as_str().to_string(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            updated_at: timestamp_to_rfc3339(room.updated_at.value()),
        }
    }
}
