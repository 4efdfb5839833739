//! Shared metronome server.
//!
//! Every client connected to the same room follows one server-authoritative
//! metronome (tempo, beats and start time).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin metrosync-server
//! cargo run --bin metrosync-server -- --host 0.0.0.0 --port 3000
//! ALLOWED_ORIGIN=https://app.example cargo run --bin metrosync-server
//! ```

use std::sync::Arc;

use clap::Parser;
use metrosync_server::{
    config::{ServerArgs, ServerConfig},
    infrastructure::repository::InMemoryRoomRepository,
    ui::Server,
};
use metrosync_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(ServerArgs::parse());
    tracing::debug!("Server config: {:?}", config);

    // 1. Create Repository (in-memory database)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create and run the server
    let server = Server::new(config, repository, Arc::new(SystemClock));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
