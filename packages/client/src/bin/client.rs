//! Terminal client for a shared metronome room with reconnection support.
//!
//! Joins a room, prints every state push with the locally derived bar/beat,
//! and sends commands typed on stdin (`start`, `stop`, `tempo`, `beats`, `sync`).
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin metrosync-client -- --room Ab3_x9Qz --user alice
//! cargo run --bin metrosync-client -- -u ws://127.0.0.1:3000 -r Ab3_x9Qz -n bob
//! ```

use clap::Parser;

use metrosync_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "metrosync-client")]
#[command(about = "Terminal client for a shared metronome room", long_about = None)]
struct Args {
    /// Room id to join (create one with `POST /room`)
    #[arg(short = 'r', long)]
    room: String,

    /// User id shown to the server
    #[arg(short = 'n', long)]
    user: String,

    /// WebSocket server base URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = metrosync_client::run_client(args.url, args.room, args.user).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
