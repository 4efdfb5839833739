//! `ConnectionSink` の実装
//!
//! - `websocket`: WebSocket を使った実装

pub mod websocket;

pub use websocket::WebSocketConnectionSink;
