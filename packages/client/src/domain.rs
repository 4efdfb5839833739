//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use metrosync_server::{
    domain::{Beats, Command, Tempo},
    infrastructure::dto::websocket::MetronomeStateMessage,
};

use crate::error::ClientError;

/// Position inside the running metronome, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatPosition {
    pub bar: u64,
    pub beat_in_bar: u32,
}

/// Offset to add to the local clock to get the server clock.
///
/// # Arguments
///
/// * `server_time` - `serverTime` of the received message (milliseconds)
/// * `local_receive_time` - Local clock when the message arrived (milliseconds)
pub fn clock_offset(server_time: i64, local_receive_time: i64) -> i64 {
    server_time - local_receive_time
}

/// Compute the current bar and beat of a playing metronome.
///
/// # Returns
///
/// `None` if the metronome is stopped, the message is malformed (zero tempo or
/// beats) or the corrected local time is still before `startTime`
pub fn beat_position(
    state: &MetronomeStateMessage,
    local_now: i64,
    offset: i64,
) -> Option<BeatPosition> {
    if !state.is_playing || state.tempo == 0 || state.beats == 0 {
        return None;
    }
    let elapsed = local_now + offset - state.start_time;
    if elapsed < 0 {
        return None;
    }

    // floor(elapsed / (60000 / tempo))
    let beat = (elapsed as u64 * u64::from(state.tempo)) / 60_000;
    let beats = u64::from(state.beats);
    Some(BeatPosition {
        bar: beat / beats + 1,
        beat_in_bar: (beat % beats) as u32 + 1,
    })
}

/// Parse a line typed on stdin into a command.
///
/// Accepted forms: `start [tempo] [beats]`, `stop`, `tempo <n>`, `beats <n>`, `sync`.
pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let mut words = line.split_whitespace();
    let invalid = || ClientError::InvalidCommand(line.trim().to_string());

    let command = match words.next().map(str::to_ascii_lowercase).as_deref() {
        Some("start") => {
            let tempo = match words.next() {
                Some(raw) => parse_tempo(raw).ok_or_else(invalid)?,
                None => Tempo::default(),
            };
            let beats = match words.next() {
                Some(raw) => parse_beats(raw).ok_or_else(invalid)?,
                None => Beats::default(),
            };
            Command::Start { tempo, beats }
        }
        Some("stop") => Command::Stop,
        Some("tempo") => Command::ChangeTempo {
            tempo: words.next().and_then(parse_tempo).ok_or_else(invalid)?,
        },
        Some("beats") => Command::ChangeBeats {
            beats: words.next().and_then(parse_beats).ok_or_else(invalid)?,
        },
        Some("sync") => Command::RequestSync,
        _ => return Err(invalid()),
    };

    if words.next().is_some() {
        return Err(invalid());
    }
    Ok(command)
}

fn parse_tempo(raw: &str) -> Option<Tempo> {
    raw.parse().ok().and_then(|bpm| Tempo::new(bpm).ok())
}

fn parse_beats(raw: &str) -> Option<Beats> {
    raw.parse().ok().and_then(|beats| Beats::new(beats).ok())
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the server refused the handshake or the URL is unusable,
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Rejected(_) | ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
