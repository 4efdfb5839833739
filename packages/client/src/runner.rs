//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the metronome client with reconnection logic
pub async fn run_client(
    url: String,
    room_id: String,
    user_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} room '{}' as '{}' (attempt {}/{})",
            url,
            room_id,
            user_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let error = match run_client_session(&url, &room_id, &user_id).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) => e,
        };

        if should_exit_immediately(&error) {
            tracing::error!("Cannot join room '{}': {}", room_id, error);
            return Err(Box::new(error));
        }

        tracing::warn!("Connection lost: {}", error);
        reconnect_count += 1;

        if !should_attempt_reconnect(&error, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                MAX_RECONNECT_ATTEMPTS
            );
            return Err(Box::new(error));
        }

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}
