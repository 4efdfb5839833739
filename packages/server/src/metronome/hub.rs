//! MetronomeHub
//!
//! コア全体の入口です。Client Registry、State Store、Sync Scheduler を束ね、
//! transport から呼ばれる操作（create-client、register、unregister、
//! start / stop / changeTempo / changeBeats、requestSync、新規参加者への
//! スナップショット送信）を提供します。
//!
//! ## ロック順序
//!
//! clients → states → schedules の順にのみ取得する。逆順に取得する経路はない。
//!
//! ## 時刻
//!
//! すべての "now" は注入された `Clock` から取得する。

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use async_trait::async_trait;
use metrosync_shared::time::Clock;

use crate::domain::{
    Beats, ChangePolicy, ClientId, ConnectionId, ConnectionSink, MetronomeState, RoomId, Tempo,
    Timestamp,
};

use super::{
    broadcast,
    registry::{Client, ClientRegistry},
    scheduler::{SyncScheduler, SyncTarget},
    store::MetronomeStore,
};

/// Sync interval used when none is configured
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(5_000);

/// Per-send timeout used when none is configured
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Tunables of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    pub sync_interval: Duration,
    pub send_timeout: Duration,
    pub change_policy: ChangePolicy,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            sync_interval: DEFAULT_SYNC_INTERVAL,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            change_policy: ChangePolicy::default(),
        }
    }
}

pub struct MetronomeHub {
    registry: ClientRegistry,
    store: MetronomeStore,
    scheduler: SyncScheduler,
    clock: Arc<dyn Clock>,
    change_policy: ChangePolicy,
    send_timeout: Duration,
    /// Handed to schedules and spawned unregistrations
    weak: Weak<Self>,
}

impl MetronomeHub {
    pub fn new(config: HubConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            registry: ClientRegistry::new(),
            store: MetronomeStore::new(),
            scheduler: SyncScheduler::new(config.sync_interval),
            clock,
            change_policy: config.change_policy,
            send_timeout: config.send_timeout,
            weak: weak.clone(),
        })
    }

    // ========================================
    // Clients
    // ========================================

    /// Create a client for an accepted connection. The client is not
    /// registered yet.
    pub fn new_client(
        &self,
        client_id: ClientId,
        room_id: RoomId,
        sink: Arc<dyn ConnectionSink>,
    ) -> Arc<Client> {
        Arc::new(Client::new(client_id, room_id, sink))
    }

    pub async fn register(&self, client: Arc<Client>) {
        tracing::info!(
            "Client '{}' joined room '{}'",
            client.client_id,
            client.room_id
        );
        self.registry.register(client).await;
    }

    /// Remove a client. When it was the last member of its room, the room's
    /// state and schedule are removed as well.
    ///
    /// Returns `false` if the client was not registered.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        let removed = self
            .registry
            .unregister(connection_id, |room_id| self.cleanup_locked(room_id))
            .await;
        match removed {
            Some(client) => {
                tracing::info!(
                    "Client '{}' left room '{}'",
                    client.client_id,
                    client.room_id
                );
                true
            }
            None => false,
        }
    }

    /// Push the room's current snapshot to one client, independent of the
    /// schedule. Returns `false` if there is no state or the send failed.
    pub async fn send_current_snapshot(&self, client: &Client) -> bool {
        let Some(state) = self.snapshot(&client.room_id) else {
            return false;
        };
        match broadcast::deliver(client, &state, self.send_timeout).await {
            Ok(()) => {
                tracing::debug!(
                    "Sent current snapshot of room '{}' to client '{}'",
                    client.room_id,
                    client.client_id
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to send snapshot to client '{}': {}",
                    client.client_id,
                    e
                );
                self.spawn_unregister(client.connection_id);
                false
            }
        }
    }

    // ========================================
    // Commands
    // ========================================

    pub async fn start(&self, room_id: &RoomId, tempo: Tempo, beats: Beats) {
        let state = self.store.start(room_id, tempo, beats, self.now());
        tracing::info!(
            "Metronome started in room '{}' (tempo: {}, beats: {})",
            room_id,
            tempo,
            beats
        );
        // 既存のスケジュールは置き換える。再生中のルームは await に入る前にスケジュールを持つ
        self.scheduler.install(room_id, self.weak.clone());
        self.broadcast(&state).await;
    }

    pub async fn stop(&self, room_id: &RoomId) {
        let Some(transition) = self.store.stop(room_id, self.now()) else {
            tracing::debug!("Ignoring stop for room '{}' without state", room_id);
            return;
        };
        self.scheduler.cancel(room_id);
        tracing::info!("Metronome stopped in room '{}'", room_id);
        self.broadcast(&transition.state).await;
    }

    pub async fn change_tempo(&self, room_id: &RoomId, tempo: Tempo) {
        let Some(transition) =
            self.store
                .change_tempo(room_id, tempo, self.now(), self.change_policy)
        else {
            tracing::debug!("Ignoring tempo change for room '{}' without state", room_id);
            return;
        };
        if transition.stopped {
            self.scheduler.cancel(room_id);
        }
        tracing::info!(
            "Tempo changed to {} in room '{}' (playing: {})",
            tempo,
            room_id,
            transition.state.is_playing
        );
        self.broadcast(&transition.state).await;
    }

    pub async fn change_beats(&self, room_id: &RoomId, beats: Beats) {
        let Some(transition) =
            self.store
                .change_beats(room_id, beats, self.now(), self.change_policy)
        else {
            tracing::debug!("Ignoring beats change for room '{}' without state", room_id);
            return;
        };
        if transition.stopped {
            self.scheduler.cancel(room_id);
        }
        tracing::info!(
            "Beats changed to {} in room '{}' (playing: {})",
            beats,
            room_id,
            transition.state.is_playing
        );
        self.broadcast(&transition.state).await;
    }

    /// Broadcast a fresh snapshot without mutating state.
    pub async fn request_sync(&self, room_id: &RoomId) {
        if let Some(state) = self.snapshot(room_id) {
            self.broadcast(&state).await;
        }
    }

    // ========================================
    // State
    // ========================================

    /// Current state of the room with `serverTime` stamped now.
    pub fn snapshot(&self, room_id: &RoomId) -> Option<MetronomeState> {
        self.store.snapshot(room_id, self.now())
    }

    /// Delete the room's state and cancel its schedule. Idempotent.
    pub fn cleanup(&self, room_id: &RoomId) {
        self.cleanup_locked(room_id);
    }

    /// Cancel every schedule.
    pub fn shutdown(&self) {
        let cancelled = self.scheduler.cancel_all();
        tracing::info!("Cancelled {} sync schedule(s)", cancelled);
    }

    pub async fn client_count(&self, room_id: &RoomId) -> usize {
        self.registry.count_in_room(room_id).await
    }

    pub fn has_state(&self, room_id: &RoomId) -> bool {
        self.store.contains(room_id)
    }

    pub fn is_scheduled(&self, room_id: &RoomId) -> bool {
        self.scheduler.is_scheduled(room_id)
    }

    // ========================================
    // internals
    // ========================================

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    async fn broadcast(&self, state: &MetronomeState) {
        let failed = self
            .registry
            .broadcast(&state.room_id, state, self.send_timeout)
            .await;
        for connection_id in failed {
            self.spawn_unregister(connection_id);
        }
    }

    fn spawn_unregister(&self, connection_id: ConnectionId) {
        let Some(hub) = self.weak.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            hub.unregister(connection_id).await;
        });
    }

    /// Room cleanup; callers hold the client set's exclusive lock when the
    /// room was found empty.
    fn cleanup_locked(&self, room_id: &RoomId) {
        let had_state = self.store.remove(room_id);
        self.scheduler.cancel(room_id);
        if had_state {
            tracing::info!("Room '{}' is empty, metronome state removed", room_id);
        }
    }
}

#[async_trait]
impl SyncTarget for MetronomeHub {
    async fn on_tick(&self, room_id: &RoomId, generation: u64) -> bool {
        if !self.scheduler.is_current(room_id, generation) {
            return false;
        }

        if !self.snapshot(room_id).is_some_and(|s| s.is_playing) {
            self.scheduler.finish(room_id, generation);
            tracing::debug!("Room '{}' is not playing, sync schedule ends", room_id);
            return false;
        }

        let emptied = self
            .registry
            .cleanup_if_empty(room_id, |room_id| {
                self.scheduler.finish(room_id, generation);
                self.cleanup_locked(room_id);
            })
            .await;
        if emptied {
            return false;
        }

        // cleanup_if_empty の待ち中に stop / start が入ったかもしれない
        if !self.scheduler.is_current(room_id, generation) {
            return false;
        }
        let Some(state) = self.snapshot(room_id).filter(|s| s.is_playing) else {
            self.scheduler.finish(room_id, generation);
            return false;
        };
        self.broadcast(&state).await;
        true
    }
}
