// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared record store: the single record and the lock guarding it.
//!
//! Every read and write of the record goes through [`RecordStore::acquire`]
//! (or the `update`/`read` helpers built on it). The returned guard derefs to
//! the record and releases the lock when dropped, on every exit path
//! including `?` returns and unwinding.
//!
//! Snapshots are taken by reference: the guard is the snapshot, and the
//! borrow checker rejects any use of it after release. Use
//! [`RecordStore::snapshot`] for an owned copy.
//!
//! The guard is `!Send`, so it cannot be held across an `.await` in a
//! spawned task. Critical sections stay synchronous and I/O free.

use parking_lot::{Mutex, MutexGuard};

/// Scoped exclusive access to the record.
pub type RecordGuard<'a, R> = MutexGuard<'a, R>;

/// Owner of the exported record.
#[derive(Debug, Default)]
pub struct RecordStore<R> {
    record: Mutex<R>,
}

impl<R> RecordStore<R> {
    /// Take ownership of `record` behind a fresh lock.
    pub fn new(record: R) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    /// Block until the lock is free and return exclusive access.
    pub fn acquire(&self) -> RecordGuard<'_, R> {
        self.record.lock()
    }

    /// Apply one batch of field writes atomically.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut R) -> T) -> T {
        let mut record = self.acquire();
        mutate(&mut record)
    }

    /// Run `inspect` against a consistent view of the record.
    pub fn read<T>(&self, inspect: impl FnOnce(&R) -> T) -> T {
        let record = self.acquire();
        inspect(&record)
    }

    /// Whether some thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.record.is_locked()
    }

    /// Consume the store and return the record.
    pub fn into_inner(self) -> R {
        self.record.into_inner()
    }
}

impl<R: Clone> RecordStore<R> {
    /// Owned copy of the record, taken under the lock.
    pub fn snapshot(&self) -> R {
        self.read(R::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Pair {
        a: u64,
        b: u64,
    }

    #[test]
    fn test_update_and_snapshot() {
        let store = RecordStore::new(Pair::default());
        let returned = store.update(|p| {
            p.a = 1;
            p.b = 1;
            p.a + p.b
        });
        assert_eq!(returned, 2);
        assert_eq!(store.snapshot(), Pair { a: 1, b: 1 });
        assert!(!store.is_locked());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let store = RecordStore::new(Pair::default());
        {
            let mut guard = store.acquire();
            guard.a = 5;
            assert!(store.is_locked());
        }
        assert!(!store.is_locked());
        assert_eq!(store.read(|p| p.a), 5);
    }

    #[test]
    fn test_guard_releases_on_panic() {
        let store = Arc::new(RecordStore::new(Pair::default()));
        let worker = {
            let store = store.clone();
            thread::spawn(move || {
                store.update(|p| {
                    p.a = 9;
                    panic!("writer failed mid-batch");
                })
            })
        };
        assert!(worker.join().is_err());
        assert!(!store.is_locked());
        // No poisoning: the store stays usable.
        assert_eq!(store.read(|p| p.a), 9);
    }

    #[test]
    fn test_batches_are_never_torn() {
        let store = Arc::new(RecordStore::new(Pair::default()));

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 1..=10_000u64 {
                    store.update(|p| {
                        p.a = i;
                        thread::yield_now();
                        p.b = i;
                    });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snap = store.snapshot();
                        assert_eq!(snap.a, snap.b, "torn read: {:?}", snap);
                    }
                })
            })
            .collect();

        writer.join().expect("writer");
        for reader in readers {
            reader.join().expect("reader");
        }
        assert_eq!(store.snapshot(), Pair { a: 10_000, b: 10_000 });
    }
}
