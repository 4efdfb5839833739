//! Domain layer for the metronome server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod command;
pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use command::Command;
pub use connection::ConnectionSink;
pub use entity::{ChangePolicy, MetronomeState, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::RoomIdFactory;
pub use repository::RoomRepository;
pub use value_object::{Beats, ClientId, ConnectionId, RoomId, Tempo, Timestamp};
