//! ConnectionSink test doubles.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{ConnectionSink, MessagePushError, MetronomeState};

/// Records every state it is asked to send.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<MetronomeState>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<MetronomeState> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<MetronomeState> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ConnectionSink for RecordingSink {
    async fn send_state(&self, state: &MetronomeState) -> Result<(), MessagePushError> {
        self.sent.lock().unwrap().push(state.clone());
        Ok(())
    }
}

/// Always reports a closed connection.
pub struct FailingSink;

#[async_trait]
impl ConnectionSink for FailingSink {
    async fn send_state(&self, _state: &MetronomeState) -> Result<(), MessagePushError> {
        Err(MessagePushError::ConnectionClosed)
    }
}

/// Never completes a send.
pub struct StalledSink;

#[async_trait]
impl ConnectionSink for StalledSink {
    async fn send_state(&self, _state: &MetronomeState) -> Result<(), MessagePushError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}
