//! Debounced timetable persistence
//!
//! Grid edits arrive in bursts. Each edit hands over a snapshot of the whole
//! grid; only the latest snapshot is kept, and it is written once no new
//! snapshot has arrived for the debounce window.
//!
//! Timetable writes from elsewhere take the same write gate as the timer
//! task, so a snapshot already being written always lands before them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::models::Timetable;
use crate::storage::Storage;

type PendingSlot = Arc<Mutex<Option<Timetable>>>;

/// Writes the latest scheduled timetable snapshot after a quiet window
pub struct DebouncedPersister<S: Storage + Clone + 'static> {
    store: S,
    pending: PendingSlot,
    notify: Arc<Notify>,
    write_gate: Arc<AsyncMutex<()>>,
    task: JoinHandle<()>,
}

/// Takes whatever is pending, leaving the slot empty
fn take_pending(pending: &PendingSlot) -> Option<Timetable> {
    match pending.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

impl<S: Storage + Clone + 'static> DebouncedPersister<S> {
    /// Starts the background timer task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: S, window: Duration) -> Self {
        let pending: PendingSlot = Arc::new(Mutex::new(None));
        let notify = Arc::new(Notify::new());
        let write_gate = Arc::new(AsyncMutex::new(()));

        let task = tokio::spawn({
            let store = store.clone();
            let pending = pending.clone();
            let notify = notify.clone();
            let write_gate = write_gate.clone();
            async move {
                loop {
                    notify.notified().await;

                    // Restart the window on every new snapshot
                    loop {
                        tokio::select! {
                            _ = tokio::time::sleep(window) => break,
                            _ = notify.notified() => continue,
                        }
                    }

                    let _gate = write_gate.lock().await;
                    let Some(snapshot) = take_pending(&pending) else {
                        debug!("Debounce window elapsed with nothing pending");
                        continue;
                    };
                    match store.save_timetable(&snapshot).await {
                        Ok(()) => debug!("Persisted timetable with {} weeks", snapshot.len()),
                        Err(err) => error!("Failed to persist timetable: {:#}", err),
                    }
                }
            }
        });

        Self { store, pending, notify, write_gate, task }
    }

    /// Waits for any snapshot write in flight and blocks new ones
    ///
    /// Hold the guard across a direct timetable write so that no older
    /// snapshot can land after it.
    pub async fn lock_writes(&self) -> AsyncMutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    /// Replaces the pending snapshot and restarts the window
    pub fn schedule(&self, snapshot: Timetable) {
        match self.pending.lock() {
            Ok(mut slot) => *slot = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
        self.notify.notify_one();
    }

    /// Drops the pending snapshot, if any, without writing it
    pub fn discard_pending(&self) -> bool {
        take_pending(&self.pending).is_some()
    }

    pub fn has_pending(&self) -> bool {
        match self.pending.lock() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }

    /// Writes the pending snapshot now instead of waiting for the window
    ///
    /// Returns `Ok(false)` when nothing was pending.
    pub async fn flush(&self) -> Result<bool> {
        let _gate = self.write_gate.lock().await;
        let Some(snapshot) = take_pending(&self.pending) else {
            return Ok(false);
        };
        self.store.save_timetable(&snapshot).await?;
        info!("Flushed pending timetable with {} weeks", snapshot.len());
        Ok(true)
    }

    /// Flushes and stops the timer task
    pub async fn shutdown(&self) -> Result<bool> {
        let flushed = self.flush().await;
        self.task.abort();
        flushed
    }
}

impl<S: Storage + Clone + 'static> Drop for DebouncedPersister<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
