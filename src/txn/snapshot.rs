// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Reader snapshots and the open-snapshot registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Tracks every open snapshot's visibility horizon, ref-counted per bound.
///
/// The minimum open bound is the low-water-mark: the oldest transaction
/// horizon any reader can still ask about, and the line garbage collection
/// must never cross. The registry is an explicit shared structure; there is
/// no thread-local or task-local snapshot state.
#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    open: Mutex<BTreeMap<u64, usize>>,
}

impl SnapshotRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the minimum visibility horizon among open snapshots, or
    /// `None` when no snapshot is open.
    pub fn low_water_mark(&self) -> Option<u64> {
        self.open.lock().keys().next().copied()
    }

    /// Returns the number of open snapshots.
    pub fn open_count(&self) -> usize {
        self.open.lock().values().sum()
    }

    fn register(&self, bound: u64) {
        *self.open.lock().entry(bound).or_insert(0) += 1;
    }

    fn deregister(&self, bound: u64) {
        let mut open = self.open.lock();
        match open.get_mut(&bound) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                open.remove(&bound);
            }
            // Deregistering twice would be a bug in Snapshot's Drop, not
            // recoverable state; ignore rather than poison the registry.
            None => {}
        }
    }
}

/// An immutable transaction-time horizon for one reader.
///
/// All reads bound to a snapshot observe exactly the records with
/// `tx_id <= visible_max_tx_id`, giving repeatable reads without locking.
/// Dropping the snapshot releases its pin on the low-water-mark.
#[derive(Debug)]
pub struct Snapshot {
    visible_max_tx_id: u64,
    registry: Arc<SnapshotRegistry>,
}

impl Snapshot {
    /// Opens a snapshot at an explicit horizon and registers it.
    ///
    /// Most callers want [`MvccManager::begin_read`] instead, which pins
    /// the current committed horizon; an explicit bound is for historical
    /// reads and benchmarks.
    ///
    /// [`MvccManager::begin_read`]: super::MvccManager::begin_read
    pub fn open(visible_max_tx_id: u64, registry: Arc<SnapshotRegistry>) -> Self {
        registry.register(visible_max_tx_id);
        Self {
            visible_max_tx_id,
            registry,
        }
    }

    /// The newest transaction id this snapshot can observe.
    #[inline]
    pub fn visible_max_tx_id(&self) -> u64 {
        self.visible_max_tx_id
    }

    /// Returns true if a record committed by `tx_id` is visible here.
    #[inline]
    pub fn is_visible(&self, tx_id: u64) -> bool {
        tx_id <= self.visible_max_tx_id
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        self.registry.deregister(self.visible_max_tx_id);
    }
}
