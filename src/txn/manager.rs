// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! MVCC coordination: snapshot readers, single exclusive writer.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::clock::{Clock, TxIdAllocator};
use crate::storage::{BitemporalKey, ValueEnvelope, VersionRecord, VersionStore};

use super::error::TxnError;
use super::snapshot::{Snapshot, SnapshotRegistry};

/// Coordinates snapshot readers and the single writer over a version store.
///
/// Readers capture a transaction-time horizon in constant time and are never
/// blocked by the writer. Writers serialize on one process-wide lock, buffer
/// their records, and publish them with a single atomic substrate commit.
/// A writer crash before commit leaves the previous committed state intact;
/// recovery at this layer is a no-op.
pub struct MvccManager<S: VersionStore> {
    store: Arc<S>,
    allocator: Arc<TxIdAllocator>,
    clock: Arc<dyn Clock>,
    snapshots: Arc<SnapshotRegistry>,
    writer: Mutex<()>,
}

impl<S: VersionStore> MvccManager<S> {
    /// Creates a manager with a fresh allocator starting at zero.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self::with_allocator(store, clock, TxIdAllocator::default())
    }

    /// Creates a manager resuming from an existing allocator state, e.g.
    /// the maximum committed tx id recovered from a reopened store.
    pub fn with_allocator(store: Arc<S>, clock: Arc<dyn Clock>, allocator: TxIdAllocator) -> Self {
        Self {
            store,
            allocator: Arc::new(allocator),
            clock,
            snapshots: Arc::new(SnapshotRegistry::new()),
            writer: Mutex::new(()),
        }
    }

    /// Opens a read snapshot at the current committed horizon.
    ///
    /// Constant time; never blocks on the writer and never observes a commit
    /// that completes after this call returns.
    pub fn begin_read(&self) -> Snapshot {
        Snapshot::open(self.allocator.last_committed(), Arc::clone(&self.snapshots))
    }

    /// Begins a write transaction, or fails immediately with
    /// [`TxnError::WriterBusy`] if another writer is active.
    pub fn begin_write(&self) -> Result<WriteTxn<'_, S>, TxnError> {
        match self.writer.try_lock() {
            Some(guard) => Ok(WriteTxn::new(self, guard)),
            None => Err(TxnError::WriterBusy),
        }
    }

    /// Begins a write transaction, waiting up to `timeout` for the current
    /// writer to finish.
    pub fn begin_write_timeout(&self, timeout: Duration) -> Result<WriteTxn<'_, S>, TxnError> {
        match self.writer.try_lock_for(timeout) {
            Some(guard) => Ok(WriteTxn::new(self, guard)),
            None => Err(TxnError::WriterBusy),
        }
    }

    /// The version store this manager coordinates.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The open-snapshot registry (the GC manager reads its low-water-mark).
    pub fn snapshots(&self) -> &Arc<SnapshotRegistry> {
        &self.snapshots
    }

    /// The transaction id allocator.
    pub fn allocator(&self) -> &Arc<TxIdAllocator> {
        &self.allocator
    }

    /// The injected clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

/// An exclusive write transaction.
///
/// Holds the writer lock for its lifetime. Records staged with [`put`] and
/// [`delete`] become durable and visible only when [`commit`] succeeds;
/// dropping the transaction (or calling [`abort`]) discards them with no
/// visible effect and releases the lock.
///
/// [`put`]: WriteTxn::put
/// [`delete`]: WriteTxn::delete
/// [`commit`]: WriteTxn::commit
/// [`abort`]: WriteTxn::abort
pub struct WriteTxn<'a, S: VersionStore> {
    manager: &'a MvccManager<S>,
    _guard: MutexGuard<'a, ()>,
    tx_id: Option<u64>,
    staged: Vec<VersionRecord>,
}

impl<'a, S: VersionStore> WriteTxn<'a, S> {
    fn new(manager: &'a MvccManager<S>, guard: MutexGuard<'a, ()>) -> Self {
        Self {
            manager,
            _guard: guard,
            tx_id: None,
            staged: Vec::new(),
        }
    }

    /// The transaction id this transaction will commit under, reserved on
    /// first write. `None` until then.
    #[inline]
    pub fn tx_id(&self) -> Option<u64> {
        self.tx_id
    }

    /// Number of records staged so far.
    #[inline]
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    /// Stages a new version of `(partition, user_key)`.
    ///
    /// `valid_from` defaults to the injected clock's current time when
    /// omitted; since the clock is read inside the writer critical section,
    /// the default is commit time, not transaction-start time. Returns the
    /// record that will be appended on commit.
    pub fn put(
        &mut self,
        partition: u32,
        user_key: impl Into<Vec<u8>>,
        value: ValueEnvelope,
        valid_from: Option<u64>,
    ) -> VersionRecord {
        let tx_id = match self.tx_id {
            Some(id) => id,
            None => {
                let id = self.manager.allocator.reserve();
                self.tx_id = Some(id);
                id
            }
        };
        let valid_from = valid_from.unwrap_or_else(|| self.manager.clock.now_micros());

        let record = VersionRecord::new(
            BitemporalKey::new(partition, user_key, valid_from, tx_id),
            value,
        );
        self.staged.push(record.clone());
        record
    }

    /// Stages a logical deletion: a tombstone version. History is preserved;
    /// physical removal is the GC manager's job.
    pub fn delete(
        &mut self,
        partition: u32,
        user_key: impl Into<Vec<u8>>,
        valid_from: Option<u64>,
    ) -> VersionRecord {
        self.put(partition, user_key, ValueEnvelope::tombstone(), valid_from)
    }

    /// Commits the staged records in one atomic substrate write and
    /// publishes the transaction id to future snapshots.
    ///
    /// Either every staged record becomes visible or, on error, none do.
    /// A transaction with no staged records commits as a no-op and consumes
    /// no transaction id.
    pub fn commit(self) -> Result<Vec<VersionRecord>, TxnError> {
        let Some(tx_id) = self.tx_id else {
            return Ok(Vec::new());
        };

        self.manager.store.append(self.staged.clone())?;
        // Only after the substrate commit is durable does the id become
        // visible to new snapshots.
        self.manager.allocator.publish(tx_id);

        debug!(tx_id, records = self.staged.len(), "write transaction committed");
        Ok(self.staged)
    }

    /// Discards all staged records and releases the writer lock.
    /// Equivalent to dropping the transaction.
    pub fn abort(self) {
        if let Some(tx_id) = self.tx_id {
            debug!(tx_id, records = self.staged.len(), "write transaction aborted");
        }
        // Nothing was persisted and nothing was published; dropping the
        // guard is the entire rollback.
    }
}
