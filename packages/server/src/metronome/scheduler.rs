//! Sync Scheduler
//!
//! One periodic re-broadcast task per playing room. Handles live in a map
//! keyed by room id; installing a schedule replaces (and aborts) the previous
//! one under the map lock, so at most one task per room is ever live.
//!
//! Each handle carries a generation number. A task that decides to stop
//! removes its own entry only while the generation still matches, so a
//! finishing task can never remove the schedule that superseded it.

use std::{
    collections::HashMap,
    sync::{
        Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::RoomId;

/// Whatever a schedule re-broadcasts to.
#[async_trait]
pub trait SyncTarget: Send + Sync + 'static {
    /// Called on every tick. Returning `false` ends the schedule.
    async fn on_tick(&self, room_id: &RoomId, generation: u64) -> bool;
}

struct ScheduleHandle {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    /// Drop the handle without aborting the task.
    fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

pub struct SyncScheduler {
    interval: Duration,
    schedules: Mutex<HashMap<RoomId, ScheduleHandle>>,
    next_generation: AtomicU64,
}

impl SyncScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            schedules: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Install a schedule for `room_id`, superseding any existing one.
    ///
    /// The first tick fires one interval from now. The task holds only a weak
    /// reference to `target` and ends once the target is gone.
    pub fn install<T: SyncTarget>(&self, room_id: &RoomId, target: Weak<T>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let interval = self.interval;
        let task_room = room_id.clone();

        let mut schedules = self.lock();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(target) = target.upgrade() else {
                    break;
                };
                if !target.on_tick(&task_room, generation).await {
                    break;
                }
            }
            tracing::debug!("Sync schedule #{} for room '{}' ended", generation, task_room);
        });

        let previous = schedules.insert(
            room_id.clone(),
            ScheduleHandle {
                generation,
                task: Some(task),
            },
        );
        drop(schedules);

        // dropping the previous handle aborts its task
        if let Some(previous) = previous {
            tracing::debug!(
                "Superseded sync schedule #{} for room '{}'",
                previous.generation,
                room_id
            );
        }
        tracing::debug!(
            "Installed sync schedule #{} for room '{}' ({:?})",
            generation,
            room_id,
            interval
        );
        generation
    }

    /// Cancel the schedule for `room_id`. No-op if none exists.
    pub fn cancel(&self, room_id: &RoomId) -> bool {
        let removed = self.lock().remove(room_id);
        if removed.is_some() {
            tracing::debug!("Cancelled sync schedule for room '{}'", room_id);
        }
        removed.is_some()
    }

    /// Remove the entry of a task that is ending by itself, if it is still
    /// the current one. The task is not aborted.
    pub fn finish(&self, room_id: &RoomId, generation: u64) -> bool {
        let mut schedules = self.lock();
        if schedules.get(room_id).map(|h| h.generation) != Some(generation) {
            return false;
        }
        if let Some(handle) = schedules.remove(room_id) {
            handle.detach();
        }
        true
    }

    /// Whether `generation` is the live schedule of `room_id`.
    pub fn is_current(&self, room_id: &RoomId, generation: u64) -> bool {
        self.lock().get(room_id).map(|h| h.generation) == Some(generation)
    }

    #[cfg(test)]
    pub(crate) fn current_generation(&self, room_id: &RoomId) -> Option<u64> {
        self.lock().get(room_id).map(|h| h.generation)
    }

    pub fn is_scheduled(&self, room_id: &RoomId) -> bool {
        self.lock().contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cancel every schedule.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<ScheduleHandle> = self.lock().drain().map(|(_, h)| h).collect();
        drained.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RoomId, ScheduleHandle>> {
        self.schedules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
