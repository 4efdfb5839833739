//! Synchronization engine.
//!
//! - `registry`: connected clients, grouped by room on demand
//! - `store`: at most one playback state per room
//! - `scheduler`: one periodic re-broadcast task per playing room
//! - `broadcast`: failure-isolated fan-out with a per-send timeout
//! - `hub`: the operations the transport layer calls

pub mod broadcast;
pub mod hub;
pub mod registry;
pub mod scheduler;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use hub::{DEFAULT_SEND_TIMEOUT, DEFAULT_SYNC_INTERVAL, HubConfig, MetronomeHub};
pub use registry::{Client, ClientRegistry};
pub use scheduler::{SyncScheduler, SyncTarget};
pub use store::{MetronomeStore, Transition};
