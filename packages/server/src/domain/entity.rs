//! Entities for domain models.
//!
//! `MetronomeState` is the single shared fact of a room; every transition
//! takes the current time as an argument so the state never reads a clock
//! itself.

use super::value_object::{Beats, RoomId, Tempo, Timestamp};

/// How tempo and beat changes interact with a playing metronome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangePolicy {
    /// Apply the change and stop playback; a new start is required.
    #[default]
    StopOnChange,
    /// Keep playing and move the phase anchor so the elapsed beat count is
    /// continuous across the change.
    PhasePreserving,
}

/// Playback state of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetronomeState {
    pub room_id: RoomId,
    pub is_playing: bool,
    pub tempo: Tempo,
    pub beats: Beats,
    /// Phase anchor: the instant the current tempo/beat combination began.
    pub start_time: Timestamp,
    /// Stamped at transmission time.
    pub server_time: Timestamp,
}

impl MetronomeState {
    /// Create a playing state whose phase begins at `now`.
    pub fn started(room_id: RoomId, tempo: Tempo, beats: Beats, now: Timestamp) -> Self {
        Self {
            room_id,
            is_playing: true,
            tempo,
            beats,
            start_time: now,
            server_time: now,
        }
    }

    /// Restart playback from beat zero, discarding the prior phase.
    pub fn restart(&mut self, tempo: Tempo, beats: Beats, now: Timestamp) {
        self.is_playing = true;
        self.tempo = tempo;
        self.beats = beats;
        self.start_time = now;
        self.server_time = now;
    }

    pub fn stop(&mut self, now: Timestamp) {
        self.is_playing = false;
        self.server_time = now;
    }

    /// Apply a tempo change under `policy`.
    ///
    /// Returns `true` when the change stopped a playing metronome, in which
    /// case the caller must cancel the room's schedule.
    pub fn change_tempo(&mut self, tempo: Tempo, now: Timestamp, policy: ChangePolicy) -> bool {
        let was_playing = self.is_playing;
        if was_playing {
            match policy {
                ChangePolicy::StopOnChange => self.is_playing = false,
                ChangePolicy::PhasePreserving => {
                    let elapsed_beats = self.elapsed_beats(now);
                    let offset = (elapsed_beats * tempo.beat_interval_ms()).round() as i64;
                    self.start_time = Timestamp::new(now.value() - offset);
                }
            }
        }
        self.tempo = tempo;
        self.server_time = now;
        was_playing && !self.is_playing
    }

    /// Apply a beats-per-measure change under `policy`. The phase anchor is
    /// never moved.
    ///
    /// Returns `true` when the change stopped a playing metronome.
    pub fn change_beats(&mut self, beats: Beats, now: Timestamp, policy: ChangePolicy) -> bool {
        let stopped = self.is_playing && policy == ChangePolicy::StopOnChange;
        if stopped {
            self.is_playing = false;
        }
        self.beats = beats;
        self.server_time = now;
        stopped
    }

    /// Copy of the state with `server_time` set to `now`.
    pub fn stamped(&self, now: Timestamp) -> Self {
        Self {
            server_time: now,
            ..self.clone()
        }
    }

    /// Beats elapsed since the phase anchor at `now` (fractional).
    pub fn elapsed_beats(&self, now: Timestamp) -> f64 {
        let elapsed_ms = (now.value() - self.start_time.value()) as f64;
        elapsed_ms / self.tempo.beat_interval_ms()
    }
}

/// Room record handed out by the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_state(now: i64) -> MetronomeState {
        MetronomeState::started(
            RoomId::new("r1".to_string()).unwrap(),
            Tempo::new(120).unwrap(),
            Beats::new(4).unwrap(),
            Timestamp::new(now),
        )
    }

    #[test]
    fn test_started_anchors_phase_at_now() {
        // テスト項目: 開始直後は startTime と serverTime が一致する
        // when (操作):
        let state = create_test_state(1_000);

        // then (期待する結果):
        assert!(state.is_playing);
        assert_eq!(state.start_time, state.server_time);
        assert_eq!(state.start_time.value(), 1_000);
    }

    #[test]
    fn test_restart_discards_prior_phase() {
        // テスト項目: 再スタートで位相がリセットされる
        // given (前提条件):
        let mut state = create_test_state(1_000);
        state.stop(Timestamp::new(2_000));

        // when (操作):
        state.restart(
            Tempo::new(90).unwrap(),
            Beats::new(3).unwrap(),
            Timestamp::new(5_000),
        );

        // then (期待する結果):
        assert!(state.is_playing);
        assert_eq!(state.tempo.value(), 90);
        assert_eq!(state.beats.value(), 3);
        assert_eq!(state.start_time.value(), 5_000);
        assert_eq!(state.server_time.value(), 5_000);
    }

    #[test]
    fn test_stop_keeps_anchor() {
        // テスト項目: 停止は serverTime のみ更新し、startTime は変えない
        // given (前提条件):
        let mut state = create_test_state(1_000);

        // when (操作):
        state.stop(Timestamp::new(3_000));

        // then (期待する結果):
        assert!(!state.is_playing);
        assert_eq!(state.start_time.value(), 1_000);
        assert_eq!(state.server_time.value(), 3_000);
    }

    #[test]
    fn test_change_tempo_stop_on_change() {
        // テスト項目: StopOnChange ではテンポ変更で再生が停止する
        // given (前提条件):
        let mut state = create_test_state(1_000);

        // when (操作):
        let stopped = state.change_tempo(
            Tempo::new(60).unwrap(),
            Timestamp::new(4_000),
            ChangePolicy::StopOnChange,
        );

        // then (期待する結果):
        assert!(stopped);
        assert!(!state.is_playing);
        assert_eq!(state.tempo.value(), 60);
        assert_eq!(state.start_time.value(), 1_000);
        assert_eq!(state.server_time.value(), 4_000);
    }

    #[test]
    fn test_change_tempo_phase_preserving_keeps_elapsed_beats() {
        // テスト項目: PhasePreserving では経過拍数が変化前後で連続する
        // given (前提条件): 120 BPM (500ms/拍) で 3000ms 経過 = 6 拍
        let mut state = create_test_state(1_000);
        let now = Timestamp::new(4_000);
        let before = state.elapsed_beats(now);

        // when (操作): 90 BPM (666.67ms/拍) に変更
        let stopped = state.change_tempo(Tempo::new(90).unwrap(), now, ChangePolicy::PhasePreserving);

        // then (期待する結果):
        assert!(!stopped);
        assert!(state.is_playing);
        assert_eq!(state.start_time.value(), 0);
        let after = state.elapsed_beats(now);
        assert!((before - after).abs() < 1.0);
        assert!((after - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_change_tempo_while_stopped_only_updates_tempo() {
        // テスト項目: 停止中のテンポ変更は位相に影響しない
        // given (前提条件):
        let mut state = create_test_state(1_000);
        state.stop(Timestamp::new(2_000));

        // when (操作):
        let stopped = state.change_tempo(
            Tempo::new(200).unwrap(),
            Timestamp::new(3_000),
            ChangePolicy::PhasePreserving,
        );

        // then (期待する結果):
        assert!(!stopped);
        assert!(!state.is_playing);
        assert_eq!(state.tempo.value(), 200);
        assert_eq!(state.start_time.value(), 1_000);
    }

    #[test]
    fn test_change_beats_never_moves_anchor() {
        // テスト項目: 拍子変更は startTime を変更しない
        // given (前提条件):
        let mut phase = create_test_state(1_000);
        let mut stop = create_test_state(1_000);

        // when (操作):
        let phase_stopped = phase.change_beats(
            Beats::new(7).unwrap(),
            Timestamp::new(2_500),
            ChangePolicy::PhasePreserving,
        );
        let stop_stopped = stop.change_beats(
            Beats::new(7).unwrap(),
            Timestamp::new(2_500),
            ChangePolicy::StopOnChange,
        );

        // then (期待する結果):
        assert!(!phase_stopped);
        assert!(phase.is_playing);
        assert!(stop_stopped);
        assert!(!stop.is_playing);
        for s in [&phase, &stop] {
            assert_eq!(s.beats.value(), 7);
            assert_eq!(s.start_time.value(), 1_000);
            assert_eq!(s.server_time.value(), 2_500);
        }
    }

    #[test]
    fn test_stamped_refreshes_server_time_only() {
        // テスト項目: stamped は serverTime だけを更新したコピーを返す
        // given (前提条件):
        let state = create_test_state(1_000);

        // when (操作):
        let snapshot = state.stamped(Timestamp::new(9_999));

        // then (期待する結果):
        assert_eq!(snapshot.server_time.value(), 9_999);
        assert_eq!(snapshot.start_time, state.start_time);
        assert_eq!(state.server_time.value(), 1_000);
    }

    #[test]
    fn test_room_new_sets_updated_at() {
        // テスト項目: 新規 Room の updated_at は created_at と同じ
        // when (操作):
        let room = Room::new(RoomId::new("abcdEFGH".to_string()).unwrap(), Timestamp::new(42));

        // then (期待する結果):
        assert_eq!(room.created_at, room.updated_at);
    }
}
