//! UseCase layer.
//!
//! WebSocket 側（connect / dispatch / disconnect）はコアの `MetronomeHub` を、
//! REST 側（create / get room）は `RoomRepository` を操作します。

pub mod connect_client;
pub mod create_room;
pub mod disconnect_client;
pub mod dispatch_command;
pub mod error;
pub mod get_metronome_state;
pub mod get_room;

pub use connect_client::ConnectClientUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatch_command::DispatchCommandUseCase;
pub use error::{CreateRoomError, GetMetronomeStateError, GetRoomError};
pub use get_metronome_state::GetMetronomeStateUseCase;
pub use get_room::GetRoomUseCase;
