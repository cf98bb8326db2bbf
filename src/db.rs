// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Embedded database facade.
//!
//! Wires the version store, clock, allocator, snapshot manager, and GC
//! manager together and exposes the handful of operations API layers
//! consume: put, get_latest, the temporal queries, logical delete, and GC.
//! Each one-shot write runs as its own write transaction; callers needing
//! multi-record atomicity or pinned reads drop down to [`EraDb::begin_write`]
//! and [`EraDb::begin_read`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock, TxIdAllocator};
use crate::gc::{GcError, GcManager, GcStats, RetentionPolicy};
use crate::query;
use crate::storage::{
    DurabilityMode, RocksVersionStore, StorageError, ValueEnvelope, VersionRecord, VersionStore,
};
use crate::txn::{MvccManager, Snapshot, TxnError, WriteTxn};

/// How long a one-shot write waits for the writer lock before giving up
/// with [`TxnError::WriterBusy`].
const ONE_SHOT_WRITE_WAIT: Duration = Duration::from_secs(5);

/// An embedded bitemporal database over RocksDB.
pub struct EraDb {
    manager: MvccManager<RocksVersionStore>,
    gc: GcManager<RocksVersionStore>,
}

impl EraDb {
    /// Opens or creates a database at `path` with the system clock and
    /// default durability.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with(path, DurabilityMode::default(), Arc::new(SystemClock))
    }

    /// Opens or creates a database with an explicit durability mode and
    /// clock. The tx id allocator resumes from the maximum committed id
    /// already in the store.
    pub fn open_with(
        path: &Path,
        durability: DurabilityMode,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let store = Arc::new(RocksVersionStore::open_with_durability(path, durability)?);
        let allocator = TxIdAllocator::new(store.max_tx_id()?);

        let manager = MvccManager::with_allocator(Arc::clone(&store), Arc::clone(&clock), allocator);
        let gc = GcManager::new(
            store,
            Arc::clone(manager.allocator()),
            Arc::clone(manager.snapshots()),
            clock,
        );

        Ok(Self { manager, gc })
    }

    /// Records a new version of `(partition, user_key)` in its own write
    /// transaction. `valid_from` defaults to the clock's current time.
    pub fn put(
        &self,
        partition: u32,
        user_key: impl Into<Vec<u8>>,
        value: ValueEnvelope,
        valid_from: Option<u64>,
    ) -> Result<VersionRecord, TxnError> {
        let mut txn = self.manager.begin_write_timeout(ONE_SHOT_WRITE_WAIT)?;
        let record = txn.put(partition, user_key, value, valid_from);
        txn.commit()?;
        Ok(record)
    }

    /// Logically deletes `(partition, user_key)` by appending a tombstone
    /// version. History stays queryable; see [`EraDb::run_gc`] for physical
    /// removal.
    pub fn delete(
        &self,
        partition: u32,
        user_key: impl Into<Vec<u8>>,
        valid_from: Option<u64>,
    ) -> Result<VersionRecord, TxnError> {
        let mut txn = self.manager.begin_write_timeout(ONE_SHOT_WRITE_WAIT)?;
        let record = txn.delete(partition, user_key, valid_from);
        txn.commit()?;
        Ok(record)
    }

    /// Returns the newest version of the key, or `None` if it never existed
    /// or its newest version is a tombstone.
    pub fn get_latest(
        &self,
        partition: u32,
        user_key: &[u8],
    ) -> Result<Option<VersionRecord>, StorageError> {
        let latest = self.manager.store().get_latest(partition, user_key)?;
        Ok(latest.filter(|record| !record.is_tombstone()))
    }

    /// What was true at `valid_time`, as currently known.
    pub fn get_as_of_valid(
        &self,
        partition: u32,
        user_key: &[u8],
        valid_time: u64,
    ) -> Result<Option<VersionRecord>, StorageError> {
        let snapshot = self.manager.begin_read();
        query::get_as_of_valid(
            self.manager.store().as_ref(),
            partition,
            user_key,
            valid_time,
            &snapshot,
        )
    }

    /// What was true at `valid_time`, as known at transaction horizon
    /// `tx_bound`.
    pub fn get_as_of_transaction(
        &self,
        partition: u32,
        user_key: &[u8],
        tx_bound: u64,
        valid_time: u64,
    ) -> Result<Option<VersionRecord>, StorageError> {
        query::get_as_of_transaction(
            self.manager.store().as_ref(),
            partition,
            user_key,
            tx_bound,
            valid_time,
        )
    }

    /// One record per valid-time change point in `[start, end)`, as
    /// currently known.
    pub fn get_between_valid(
        &self,
        partition: u32,
        user_key: &[u8],
        start: u64,
        end: u64,
    ) -> Result<Vec<VersionRecord>, StorageError> {
        let snapshot = self.manager.begin_read();
        query::get_between_valid(
            self.manager.store().as_ref(),
            partition,
            user_key,
            start,
            end,
            &snapshot,
        )
    }

    /// Every record committed in the transaction window `[tx_start, tx_end)`.
    pub fn get_versions_between_tx(
        &self,
        partition: u32,
        user_key: &[u8],
        tx_start: u64,
        tx_end: u64,
    ) -> Result<Vec<VersionRecord>, StorageError> {
        query::get_versions_between_tx(
            self.manager.store().as_ref(),
            partition,
            user_key,
            tx_start,
            tx_end,
        )
    }

    /// Opens a pinned read snapshot.
    pub fn begin_read(&self) -> Snapshot {
        self.manager.begin_read()
    }

    /// Begins an explicit multi-record write transaction.
    pub fn begin_write(&self) -> Result<WriteTxn<'_, RocksVersionStore>, TxnError> {
        self.manager.begin_write()
    }

    /// Runs one GC pass over a single user key's version chain.
    pub fn run_gc(
        &self,
        policy: &RetentionPolicy,
        partition: u32,
        user_key: &[u8],
    ) -> Result<GcStats, GcError> {
        self.gc.run(policy, partition, user_key)
    }

    /// The MVCC manager, for hosts wiring their own components around it.
    pub fn manager(&self) -> &MvccManager<RocksVersionStore> {
        &self.manager
    }
}
