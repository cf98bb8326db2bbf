// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Garbage collection passes over version chains.

use std::sync::Arc;

use tracing::{error, info};

use crate::clock::{Clock, TxIdAllocator};
use crate::storage::{encode_key, StorageError, VersionRecord, VersionStore};
use crate::txn::SnapshotRegistry;

use super::error::GcError;
use super::policy::RetentionPolicy;

/// Statistics from one garbage collection pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    pub versions_scanned: u64,
    pub versions_purged: u64,
    pub bytes_reclaimed: u64,
}

/// Physically purges versions that no policy clause and no open snapshot
/// still needs.
///
/// A pass never touches anything at or above the snapshot low-water-mark,
/// and additionally keeps the record each pinned horizon would resolve at
/// every change point, so open readers answer exactly as before the pass.
/// Passes are idempotent: running the same pass again purges nothing.
pub struct GcManager<S: VersionStore> {
    store: Arc<S>,
    allocator: Arc<TxIdAllocator>,
    snapshots: Arc<SnapshotRegistry>,
    clock: Arc<dyn Clock>,
}

impl<S: VersionStore> GcManager<S> {
    /// Creates a GC manager sharing the engine's store, allocator, snapshot
    /// registry, and clock.
    pub fn new(
        store: Arc<S>,
        allocator: Arc<TxIdAllocator>,
        snapshots: Arc<SnapshotRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            allocator,
            snapshots,
            clock,
        }
    }

    /// Runs one pass over a single user key's version chain and returns what
    /// it purged.
    pub fn run(
        &self,
        policy: &RetentionPolicy,
        partition: u32,
        user_key: &[u8],
    ) -> Result<GcStats, GcError> {
        let records: Vec<VersionRecord> = self
            .store
            .scan_versions(partition, user_key)?
            .collect::<Result<_, StorageError>>()?;

        let mut stats = GcStats {
            versions_scanned: records.len() as u64,
            ..GcStats::default()
        };

        let low_water_mark = self.snapshots.low_water_mark();
        let now = self.clock.now_micros();
        let last_committed = self.allocator.last_committed();

        let mut purge = Vec::new();
        for (idx, record) in records.iter().enumerate() {
            if self.retained(policy, &records, idx, low_water_mark, now, last_committed) {
                continue;
            }

            // Final guard on the invariant the retention clauses already
            // enforce: purging at or above the mark is a programming error
            // and aborts the pass with nothing deleted.
            if let Some(mark) = low_water_mark {
                if record.tx_id() >= mark {
                    error!(
                        partition,
                        tx_id = record.tx_id(),
                        low_water_mark = mark,
                        "gc pass aborted: purge candidate above low-water-mark"
                    );
                    return Err(GcError::InvariantViolation {
                        tx_id: record.tx_id(),
                        low_water_mark: mark,
                    });
                }
            }

            stats.bytes_reclaimed +=
                (encode_key(&record.key).len() + 1 + record.value.len()) as u64;
            purge.push(record.key.clone());
        }

        stats.versions_purged = self.store.remove(&purge)?;

        info!(
            partition,
            scanned = stats.versions_scanned,
            purged = stats.versions_purged,
            "gc pass complete"
        );
        Ok(stats)
    }

    /// Decides whether `records[idx]` survives the pass. Clauses are ORed;
    /// `records` is ascending by (valid_from, tx_id).
    fn retained(
        &self,
        policy: &RetentionPolicy,
        records: &[VersionRecord],
        idx: usize,
        low_water_mark: Option<u64>,
        now: u64,
        last_committed: u64,
    ) -> bool {
        let record = &records[idx];

        // Newest keep_versions per key.
        if idx >= records.len().saturating_sub(policy.keep_versions) {
            return true;
        }

        // Valid-time recency.
        if let Some(duration) = policy.keep_duration {
            if now.saturating_sub(record.valid_from()) <= duration.as_micros() as u64 {
                return true;
            }
        }

        // Transaction-window recency.
        if let Some(window) = policy.keep_tx_window {
            if last_committed.saturating_sub(record.tx_id()) < window {
                return true;
            }
        }

        let Some(mark) = low_water_mark else {
            return false;
        };

        // Anything an open snapshot could still observe stays.
        if record.tx_id() >= mark {
            return true;
        }

        // The winner at the pinned horizon for this change point: the
        // highest tx_id <= mark among records sharing this valid_from.
        // Purging it would change a pinned reader's answers.
        let is_pinned_winner = !records
            .iter()
            .any(|other| {
                other.valid_from() == record.valid_from()
                    && other.tx_id() <= mark
                    && other.tx_id() > record.tx_id()
            });
        is_pinned_winner
    }
}
