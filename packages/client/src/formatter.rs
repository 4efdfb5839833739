//! Message formatting utilities for client display.

use metrosync_server::infrastructure::dto::websocket::MetronomeStateMessage;
use metrosync_shared::time::timestamp_to_rfc3339;

use crate::domain::BeatPosition;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown right after connecting
    pub fn format_connected(room_id: &str, user_id: &str) -> String {
        format!(
            "\nJoined room '{}' as '{}'.\n{}",
            room_id,
            user_id,
            Self::format_help()
        )
    }

    /// Format a metronome state push
    ///
    /// # Arguments
    ///
    /// * `state` - The received state
    /// * `offset` - Server clock minus local clock (milliseconds)
    /// * `position` - Beat position at receive time, if playing
    pub fn format_state(
        state: &MetronomeStateMessage,
        offset: i64,
        position: Option<BeatPosition>,
    ) -> String {
        let status = if state.is_playing { "PLAYING" } else { "STOPPED" };
        let mut output = format!(
            "\n[{}] {} BPM, {}/4 (offset {:+} ms)\n",
            status, state.tempo, state.beats, offset
        );
        output.push_str(&format!(
            "  started at {}\n",
            timestamp_to_rfc3339(state.start_time)
        ));
        if let Some(position) = position {
            output.push_str(&format!(
                "  bar {} beat {}/{}\n",
                position.bar, position.beat_in_bar, state.beats
            ));
        }
        output
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(action: &str, sent_at: i64) -> String {
        format!("{} sent at {}\n", action, timestamp_to_rfc3339(sent_at))
    }

    /// Format the list of accepted commands
    pub fn format_help() -> String {
        "Commands:\n\
         \x20 start [tempo] [beats]  start playing (default 128 BPM, 4 beats)\n\
         \x20 stop                   stop playing\n\
         \x20 tempo <n>              change tempo (1-1000)\n\
         \x20 beats <n>              change beats per bar (1-64)\n\
         \x20 sync                   ask for a fresh snapshot\n"
            .to_string()
    }

    /// Format a raw text message (fallback when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\nReceived binary data: {} bytes\n", byte_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrosync_server::infrastructure::dto::websocket::MessageType;

    fn create_test_state(is_playing: bool) -> MetronomeStateMessage {
        MetronomeStateMessage {
            is_playing,
            tempo: 120,
            beats: 3,
            start_time: 0,
            server_time: 0,
            room_uuid: "room0001".to_string(),
            r#type: MessageType::MetronomeState,
        }
    }

    #[test]
    fn test_format_playing_state() {
        // テスト項目: 再生中の状態にはテンポ・オフセット・拍位置が表示される
        // given (前提条件):
        let state = create_test_state(true);
        let position = BeatPosition {
            bar: 2,
            beat_in_bar: 3,
        };

        // when (操作):
        let result = MessageFormatter::format_state(&state, 15, Some(position));

        // then (期待する結果):
        assert!(result.contains("[PLAYING] 120 BPM, 3/4"));
        assert!(result.contains("offset +15 ms"));
        assert!(result.contains("started at 1970-01-01T00:00:00.000Z"));
        assert!(result.contains("bar 2 beat 3/3"));
    }

    #[test]
    fn test_format_stopped_state() {
        // テスト項目: 停止中の状態には拍位置が表示されない
        // given (前提条件):
        let state = create_test_state(false);

        // when (操作):
        let result = MessageFormatter::format_state(&state, -3, None);

        // then (期待する結果):
        assert!(result.contains("[STOPPED]"));
        assert!(result.contains("offset -3 ms"));
        assert!(!result.contains("bar "));
    }

    #[test]
    fn test_format_help_lists_every_command() {
        // テスト項目: ヘルプに全コマンドが含まれる
        // when (操作):
        let help = MessageFormatter::format_help();

        // then (期待する結果):
        for command in ["start", "stop", "tempo", "beats", "sync"] {
            assert!(help.contains(command));
        }
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ受信時にバイト数が表示される
        // when (操作):
        let result = MessageFormatter::format_binary_message(1024);

        // then (期待する結果):
        assert_eq!(result, "\nReceived binary data: 1024 bytes\n");
    }
}
