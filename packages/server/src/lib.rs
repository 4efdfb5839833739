//! Shared metronome server library.
//!
//! Keeps every client connected to a room on one server-authoritative
//! metronome clock: start/stop, tempo and beat changes from any participant
//! are re-broadcast to the whole room together with the server's notion of
//! "now", and a per-room schedule keeps re-sending it so clients can correct
//! clock drift.

// layers
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod metronome;
pub mod ui;
pub mod usecase;
