// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Temporal query resolution algorithms.
//!
//! Stateless functions over version-store scans. Each walks one user key's
//! version chain, which the store yields ascending by (valid_from, tx_id);
//! the transaction bound filters candidates first, then valid time picks a
//! winner, then tx_id breaks valid-time ties (a later correction at the same
//! valid time wins). The order of those steps is significant.
//!
//! Point lookups treat a tombstone winner as absence: the key did not exist
//! at that moment. History listings (`get_between_valid`,
//! `get_versions_between_tx`) keep tombstone records, since a deletion is a
//! change like any other.

use crate::storage::{StorageError, VersionRecord, VersionStore};
use crate::txn::Snapshot;

/// Returns what was true at `valid_time`, as known to `snapshot`.
///
/// Among records with `tx_id` within the snapshot and
/// `valid_from <= valid_time`, picks the maximum `valid_from`, ties broken
/// by maximum `tx_id`. `None` if the key did not yet exist (or was deleted)
/// as of that valid time.
pub fn get_as_of_valid<S: VersionStore + ?Sized>(
    store: &S,
    partition: u32,
    user_key: &[u8],
    valid_time: u64,
    snapshot: &Snapshot,
) -> Result<Option<VersionRecord>, StorageError> {
    resolve_as_of(
        store,
        partition,
        user_key,
        valid_time,
        snapshot.visible_max_tx_id(),
    )
}

/// Returns what was true at `valid_time`, as known at transaction horizon
/// `tx_bound`: the same algorithm as [`get_as_of_valid`] with an explicit
/// numeric bound, for reconstructing what the system knew at any past
/// commit.
pub fn get_as_of_transaction<S: VersionStore + ?Sized>(
    store: &S,
    partition: u32,
    user_key: &[u8],
    tx_bound: u64,
    valid_time: u64,
) -> Result<Option<VersionRecord>, StorageError> {
    resolve_as_of(store, partition, user_key, valid_time, tx_bound)
}

fn resolve_as_of<S: VersionStore + ?Sized>(
    store: &S,
    partition: u32,
    user_key: &[u8],
    valid_time: u64,
    tx_bound: u64,
) -> Result<Option<VersionRecord>, StorageError> {
    let mut winner: Option<VersionRecord> = None;

    for record in store.scan_versions(partition, user_key)? {
        let record = record?;
        if record.valid_from() > valid_time {
            // Ascending scan: nothing further can qualify.
            break;
        }
        if record.tx_id() > tx_bound {
            continue;
        }
        // Ascending (valid_from, tx_id) order makes the last qualifying
        // record the (max valid_from, max tx_id) winner.
        winner = Some(record);
    }

    Ok(winner.filter(|record| !record.is_tombstone()))
}

/// Returns one record per distinct valid-time change point in
/// `[start, end)`, as known to `snapshot`, ascending.
///
/// At each change point the highest-tx_id record within the snapshot wins;
/// superseded corrections are compacted away rather than dumped per commit.
pub fn get_between_valid<S: VersionStore + ?Sized>(
    store: &S,
    partition: u32,
    user_key: &[u8],
    start: u64,
    end: u64,
    snapshot: &Snapshot,
) -> Result<Vec<VersionRecord>, StorageError> {
    let tx_bound = snapshot.visible_max_tx_id();
    let mut changes: Vec<VersionRecord> = Vec::new();

    for record in store.scan_versions(partition, user_key)? {
        let record = record?;
        if record.valid_from() >= end {
            break;
        }
        if record.valid_from() < start || record.tx_id() > tx_bound {
            continue;
        }
        match changes.last_mut() {
            // Same change point: the later commit supersedes.
            Some(last) if last.valid_from() == record.valid_from() => *last = record,
            _ => changes.push(record),
        }
    }

    Ok(changes)
}

/// Returns every record committed in the transaction window
/// `[tx_start, tx_end)`, in version-chain order, unfiltered by valid time.
pub fn get_versions_between_tx<S: VersionStore + ?Sized>(
    store: &S,
    partition: u32,
    user_key: &[u8],
    tx_start: u64,
    tx_end: u64,
) -> Result<Vec<VersionRecord>, StorageError> {
    let mut versions = Vec::new();

    for record in store.scan_versions(partition, user_key)? {
        let record = record?;
        if record.tx_id() >= tx_start && record.tx_id() < tx_end {
            versions.push(record);
        }
    }

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BitemporalKey, RocksVersionStore, ValueEnvelope};
    use crate::txn::SnapshotRegistry;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksVersionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksVersionStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn snapshot_at(bound: u64) -> Snapshot {
        Snapshot::open(bound, Arc::new(SnapshotRegistry::new()))
    }

    fn put(store: &RocksVersionStore, valid_from: u64, tx_id: u64, payload: &[u8]) {
        store
            .append(vec![VersionRecord::new(
                BitemporalKey::new(0, b"key".to_vec(), valid_from, tx_id),
                ValueEnvelope::raw(payload.to_vec()),
            )])
            .unwrap();
    }

    fn put_tombstone(store: &RocksVersionStore, valid_from: u64, tx_id: u64) {
        store
            .append(vec![VersionRecord::new(
                BitemporalKey::new(0, b"key".to_vec(), valid_from, tx_id),
                ValueEnvelope::tombstone(),
            )])
            .unwrap();
    }

    #[test]
    fn test_as_of_valid_ladder() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put(&store, 200, 2, b"B");
        let snapshot = snapshot_at(10);

        let at_150 = get_as_of_valid(&store, 0, b"key", 150, &snapshot).unwrap();
        assert_eq!(at_150.unwrap().value.payload, b"A");

        let at_250 = get_as_of_valid(&store, 0, b"key", 250, &snapshot).unwrap();
        assert_eq!(at_250.unwrap().value.payload, b"B");

        let at_50 = get_as_of_valid(&store, 0, b"key", 50, &snapshot).unwrap();
        assert!(at_50.is_none());
    }

    #[test]
    fn test_as_of_valid_boundary_is_inclusive() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        let snapshot = snapshot_at(10);

        let at_100 = get_as_of_valid(&store, 0, b"key", 100, &snapshot).unwrap();
        assert_eq!(at_100.unwrap().value.payload, b"A");
    }

    #[test]
    fn test_correction_at_equal_valid_from() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 5, b"A");
        put(&store, 100, 7, b"B");

        // The later correction wins at the current horizon...
        let now = get_as_of_valid(&store, 0, b"key", 100, &snapshot_at(10)).unwrap();
        assert_eq!(now.unwrap().value.payload, b"B");

        // ...but bounding transaction time at 5 recovers what was known then.
        let then = get_as_of_transaction(&store, 0, b"key", 5, 100).unwrap();
        assert_eq!(then.unwrap().value.payload, b"A");
    }

    #[test]
    fn test_snapshot_bound_filters_before_valid_maximization() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"old");
        put(&store, 200, 9, b"new");

        // tx 9 is beyond the snapshot, so valid_from 200 must not win even
        // though it is the valid-time maximum.
        let result = get_as_of_valid(&store, 0, b"key", 250, &snapshot_at(5)).unwrap();
        assert_eq!(result.unwrap().value.payload, b"old");
    }

    #[test]
    fn test_tombstone_reads_as_absent() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put_tombstone(&store, 200, 2);
        let snapshot = snapshot_at(10);

        let before = get_as_of_valid(&store, 0, b"key", 150, &snapshot).unwrap();
        assert_eq!(before.unwrap().value.payload, b"A");

        let after = get_as_of_valid(&store, 0, b"key", 250, &snapshot).unwrap();
        assert!(after.is_none());
    }

    #[test]
    fn test_deleted_then_rewritten() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put_tombstone(&store, 200, 2);
        put(&store, 300, 3, b"B");
        let snapshot = snapshot_at(10);

        assert!(get_as_of_valid(&store, 0, b"key", 250, &snapshot)
            .unwrap()
            .is_none());
        let revived = get_as_of_valid(&store, 0, b"key", 350, &snapshot).unwrap();
        assert_eq!(revived.unwrap().value.payload, b"B");
    }

    #[test]
    fn test_missing_key_is_empty_not_error() {
        let (store, _dir) = create_test_store();
        let snapshot = snapshot_at(10);

        assert!(get_as_of_valid(&store, 0, b"missing", 100, &snapshot)
            .unwrap()
            .is_none());
        assert!(get_between_valid(&store, 0, b"missing", 0, 1000, &snapshot)
            .unwrap()
            .is_empty());
        assert!(get_versions_between_tx(&store, 0, b"missing", 0, 1000)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_between_valid_compacts_change_points() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put(&store, 100, 4, b"A-corrected");
        put(&store, 200, 2, b"B");
        put(&store, 300, 3, b"C");
        let snapshot = snapshot_at(10);

        let changes = get_between_valid(&store, 0, b"key", 100, 300, &snapshot).unwrap();

        // One record per change point in [100, 300), corrections compacted.
        let got: Vec<_> = changes
            .iter()
            .map(|r| (r.valid_from(), r.value.payload.clone()))
            .collect();
        assert_eq!(
            got,
            vec![
                (100, b"A-corrected".to_vec()),
                (200, b"B".to_vec()),
            ]
        );
    }

    #[test]
    fn test_between_valid_respects_snapshot() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put(&store, 100, 9, b"A-future-correction");
        put(&store, 200, 8, b"B-unseen");

        let changes = get_between_valid(&store, 0, b"key", 0, 1000, &snapshot_at(5)).unwrap();

        let got: Vec<_> = changes
            .iter()
            .map(|r| (r.valid_from(), r.value.payload.clone()))
            .collect();
        assert_eq!(got, vec![(100, b"A".to_vec())]);
    }

    #[test]
    fn test_between_valid_includes_tombstone_change_points() {
        let (store, _dir) = create_test_store();
        put(&store, 100, 1, b"A");
        put_tombstone(&store, 200, 2);
        let snapshot = snapshot_at(10);

        let changes = get_between_valid(&store, 0, b"key", 0, 1000, &snapshot).unwrap();
        assert_eq!(changes.len(), 2);
        assert!(changes[1].is_tombstone());
    }

    #[test]
    fn test_versions_between_tx_window() {
        let (store, _dir) = create_test_store();
        put(&store, 300, 1, b"early-commit-late-valid");
        put(&store, 100, 2, b"v2");
        put(&store, 200, 3, b"v3");
        put(&store, 150, 5, b"v5");

        let versions = get_versions_between_tx(&store, 0, b"key", 2, 5).unwrap();

        // [2, 5): tx 1 and tx 5 excluded; valid time plays no part.
        let got: Vec<_> = versions.iter().map(|r| r.tx_id()).collect();
        assert_eq!(got, vec![2, 3]);
    }
}
