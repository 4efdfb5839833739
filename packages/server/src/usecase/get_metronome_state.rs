//! UseCase: メトロノーム状態取得処理（デバッグ用）

use std::sync::Arc;

use crate::{
    domain::{MetronomeState, RoomId},
    metronome::MetronomeHub,
};

use super::error::GetMetronomeStateError;

/// メトロノーム状態取得のユースケース
pub struct GetMetronomeStateUseCase {
    hub: Arc<MetronomeHub>,
}

impl GetMetronomeStateUseCase {
    /// 新しい GetMetronomeStateUseCase を作成
    pub fn new(hub: Arc<MetronomeHub>) -> Self {
        Self { hub }
    }

    /// 現在のスナップショットを取得
    pub fn execute(&self, room_id: String) -> Result<MetronomeState, GetMetronomeStateError> {
        let room_id =
            RoomId::try_from(room_id).map_err(|_| GetMetronomeStateError::InvalidRoomId)?;
        self.hub
            .snapshot(&room_id)
            .ok_or(GetMetronomeStateError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Beats, Tempo},
        metronome::HubConfig,
    };
    use metrosync_shared::time::FixedClock;

    #[tokio::test]
    async fn test_get_state() {
        // テスト項目: 再生開始済みのルームはスナップショットを返し、それ以外は NotFound
        // given (前提条件):
        let hub = MetronomeHub::new(HubConfig::default(), Arc::new(FixedClock::new(7)));
        let usecase = GetMetronomeStateUseCase::new(hub.clone());
        hub.start(
            &RoomId::new("r1".to_string()).unwrap(),
            Tempo::default(),
            Beats::default(),
        )
        .await;

        // then (期待する結果):
        let state = usecase.execute("r1".to_string()).unwrap();
        assert_eq!(state.server_time.value(), 7);
        assert_eq!(
            usecase.execute("r2".to_string()),
            Err(GetMetronomeStateError::NotFound)
        );
        assert_eq!(
            usecase.execute(String::new()),
            Err(GetMetronomeStateError::InvalidRoomId)
        );
    }
}
