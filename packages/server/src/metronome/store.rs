//! Metronome State Store
//!
//! ルームごとに高々 1 つの `MetronomeState` を保持します。
//!
//! - 状態は最初の start で作られ、ルームが空になったときの cleanup で削除される
//! - 状態がないルームへの stop / changeTempo / changeBeats は `None` を返す（no-op）
//! - ロック中に await しないため `std::sync::RwLock` を使う

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::domain::{Beats, ChangePolicy, MetronomeState, RoomId, Tempo, Timestamp};

/// 状態変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// 変更直後の状態（serverTime は変更時刻）
    pub state: MetronomeState,
    /// 再生中だったものが停止したか（スケジュールを止める必要があるか）
    pub stopped: bool,
}

#[derive(Default)]
pub struct MetronomeStore {
    states: RwLock<HashMap<RoomId, MetronomeState>>,
}

impl MetronomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 再生を開始する。既存の状態があれば位相を含めて上書きする
    pub fn start(&self, room_id: &RoomId, tempo: Tempo, beats: Beats, now: Timestamp) -> MetronomeState {
        let mut states = self.write();
        match states.get_mut(room_id) {
            Some(state) => {
                state.restart(tempo, beats, now);
                state.clone()
            }
            None => {
                let state = MetronomeState::started(room_id.clone(), tempo, beats, now);
                states.insert(room_id.clone(), state.clone());
                state
            }
        }
    }

    pub fn stop(&self, room_id: &RoomId, now: Timestamp) -> Option<Transition> {
        let mut states = self.write();
        let state = states.get_mut(room_id)?;
        let stopped = state.is_playing;
        state.stop(now);
        Some(Transition {
            state: state.clone(),
            stopped,
        })
    }

    pub fn change_tempo(
        &self,
        room_id: &RoomId,
        tempo: Tempo,
        now: Timestamp,
        policy: ChangePolicy,
    ) -> Option<Transition> {
        let mut states = self.write();
        let state = states.get_mut(room_id)?;
        let stopped = state.change_tempo(tempo, now, policy);
        Some(Transition {
            state: state.clone(),
            stopped,
        })
    }

    pub fn change_beats(
        &self,
        room_id: &RoomId,
        beats: Beats,
        now: Timestamp,
        policy: ChangePolicy,
    ) -> Option<Transition> {
        let mut states = self.write();
        let state = states.get_mut(room_id)?;
        let stopped = state.change_beats(beats, now, policy);
        Some(Transition {
            state: state.clone(),
            stopped,
        })
    }

    /// 現在の状態を serverTime = now で返す
    pub fn snapshot(&self, room_id: &RoomId, now: Timestamp) -> Option<MetronomeState> {
        self.read().get(room_id).map(|state| state.stamped(now))
    }

    /// 状態を削除する。削除した場合は `true`
    pub fn remove(&self, room_id: &RoomId) -> bool {
        self.write().remove(room_id).is_some()
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.read().contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // poison は無視する
    fn read(&self) -> RwLockReadGuard<'_, HashMap<RoomId, MetronomeState>> {
        self.states.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RoomId, MetronomeState>> {
        self.states.write().unwrap_or_else(PoisonError::into_inner)
    }
}
