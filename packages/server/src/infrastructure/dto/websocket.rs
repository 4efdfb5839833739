//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message kind tag of outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    MetronomeState,
}

/// Outbound state message, one per push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetronomeStateMessage {
    pub is_playing: bool,
    pub tempo: u32,
    pub beats: u32,
    /// Epoch milliseconds
    pub start_time: i64,
    /// Epoch milliseconds
    pub server_time: i64,
    pub room_uuid: String,
    pub r#type: MessageType,
}

/// Command action names
pub mod action {
    pub const START: &str = "startMetronome";
    pub const STOP: &str = "stopMetronome";
    pub const CHANGE_TEMPO: &str = "changeTempo";
    pub const CHANGE_BEATS: &str = "changeBeats";
    pub const REQUEST_SYNC: &str = "requestSync";
}

/// Inbound command message, one per frame.
///
/// Fields stay untyped so that a missing or mistyped number falls back to its
/// default instead of failing the whole frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beats: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_message_wire_format() {
        // テスト項目: 状態メッセージが camelCase の JSON にシリアライズされる
        // given (前提条件):
        let msg = MetronomeStateMessage {
            is_playing: true,
            tempo: 100,
            beats: 3,
            start_time: 1_700_000_000_000,
            server_time: 1_700_000_000_500,
            room_uuid: "r1".to_string(),
            r#type: MessageType::MetronomeState,
        };

        // when (操作):
        let json: Value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "isPlaying": true,
                "tempo": 100,
                "beats": 3,
                "startTime": 1_700_000_000_000_i64,
                "serverTime": 1_700_000_000_500_i64,
                "roomUuid": "r1",
                "type": "metronomeState"
            })
        );
    }

    #[test]
    fn test_command_message_accepts_missing_and_mistyped_fields() {
        // テスト項目: フィールドが欠けていたり型が違っていてもデコードできる
        // when (操作):
        let empty: CommandMessage = serde_json::from_str("{}").unwrap();
        let mistyped: CommandMessage =
            serde_json::from_str(r#"{"action":"startMetronome","tempo":"fast","beats":null}"#)
                .unwrap();

        // then (期待する結果):
        assert_eq!(empty, CommandMessage::default());
        assert_eq!(mistyped.tempo, Some(Value::String("fast".to_string())));
        assert_eq!(mistyped.beats, None);
    }

    #[test]
    fn test_command_message_rejects_non_json() {
        // テスト項目: JSON でないフレームはデコードエラーになる
        // then (期待する結果):
        assert!(serde_json::from_str::<CommandMessage>("start please").is_err());
        assert!(serde_json::from_str::<CommandMessage>("42").is_err());
    }
}
