//! Commands a participant can issue against its room's metronome.

use super::value_object::{Beats, Tempo};

/// One decoded inbound command.
///
/// Values are already validated; the transport substitutes the defaults for
/// missing or out-of-range numbers before a command is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { tempo: Tempo, beats: Beats },
    Stop,
    ChangeTempo { tempo: Tempo },
    ChangeBeats { beats: Beats },
    RequestSync,
    /// Unrecognized or missing action; logged and ignored.
    Unknown { action: Option<String> },
}

impl Command {
    /// Name used in logs.
    pub fn name(&self) -> &str {
        match self {
            Command::Start { .. } => "startMetronome",
            Command::Stop => "stopMetronome",
            Command::ChangeTempo { .. } => "changeTempo",
            Command::ChangeBeats { .. } => "changeBeats",
            Command::RequestSync => "requestSync",
            Command::Unknown { action } => action.as_deref().unwrap_or("<missing>"),
        }
    }
}
