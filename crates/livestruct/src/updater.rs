// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Background updater.
//!
//! Periodically applies a batch of field writes to the record. Each batch runs
//! under the store lock, so readers see the record either before or after a
//! batch, never partway through.

use crate::store::RecordStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Handle to a running updater task.
#[derive(Debug, Clone)]
pub struct UpdaterHandle {
    running: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl UpdaterHandle {
    /// Check if the updater is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Request the updater to stop. Takes effect before the next batch.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Number of batches applied so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

/// Spawn a task that applies `mutate` to the record every `interval`.
///
/// The first batch runs one full interval after spawning. Must be called
/// from within a tokio runtime.
pub fn spawn_updater<R, F>(
    store: Arc<RecordStore<R>>,
    interval: Duration,
    mut mutate: F,
) -> UpdaterHandle
where
    R: Send + 'static,
    F: FnMut(&mut R) + Send + 'static,
{
    let handle = UpdaterHandle {
        running: Arc::new(AtomicBool::new(true)),
        generation: Arc::new(AtomicU64::new(0)),
    };

    let task = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        tracing::info!("Updater started ({:?} interval)", interval);
        loop {
            ticker.tick().await;
            if !task.is_running() {
                break;
            }
            store.update(&mut mutate);
            let generation = task.generation.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::trace!("Applied update batch {}", generation);
        }
        tracing::info!("Updater stopped after {} batches", task.generation());
    });

    handle
}
