//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase, DispatchCommandUseCase,
        GetMetronomeStateUseCase, GetRoomUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchCommandUseCase（コマンド処理のユースケース）
    pub dispatch_command_usecase: Arc<DispatchCommandUseCase>,
    /// CreateRoomUseCase（Room 作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomUseCase（Room 取得のユースケース）
    pub get_room_usecase: Arc<GetRoomUseCase>,
    /// GetMetronomeStateUseCase（メトロノーム状態取得のユースケース）
    pub get_metronome_state_usecase: Arc<GetMetronomeStateUseCase>,
}
