//! Infrastructure layer.
//!
//! - `dto`: wire formats (WebSocket JSON messages, HTTP responses)
//! - `repository`: room storage implementations
//! - `connection`: `ConnectionSink` implementations

pub mod connection;
pub mod dto;
pub mod repository;
