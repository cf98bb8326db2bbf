// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Version store trait definition.

use super::key::BitemporalKey;
use super::value::VersionRecord;
use super::StorageError;

/// A lazy cursor over one key's version chain, ascending by
/// (valid_from, tx_id). Restart a scan by calling
/// [`VersionStore::scan_versions`] again.
pub type VersionScan<'a> = Box<dyn Iterator<Item = Result<VersionRecord, StorageError>> + 'a>;

/// The append-only version store.
///
/// Stores immutable version records addressed by bitemporal keys. Records are
/// only ever appended (a commit) or physically removed (garbage collection);
/// nothing is mutated in place. Durability and commit atomicity are delegated
/// to the underlying substrate.
pub trait VersionStore: Send + Sync {
    /// Atomically appends a batch of records: one call, one substrate
    /// commit, all-or-nothing.
    fn append(&self, records: Vec<VersionRecord>) -> Result<(), StorageError>;

    /// Returns the record with maximum (valid_from, tx_id) for the user key,
    /// tombstones included. `None` if no version exists.
    fn get_latest(
        &self,
        partition: u32,
        user_key: &[u8],
    ) -> Result<Option<VersionRecord>, StorageError>;

    /// Returns a lazy cursor over all versions of the user key, ascending by
    /// (valid_from, tx_id), backed by a substrate range cursor.
    fn scan_versions(
        &self,
        partition: u32,
        user_key: &[u8],
    ) -> Result<VersionScan<'_>, StorageError>;

    /// Physically deletes the given versions. Reserved for the GC manager.
    /// Removing an absent key is a no-op, so a repeated pass converges.
    /// Returns the number of keys submitted for deletion.
    fn remove(&self, keys: &[BitemporalKey]) -> Result<u64, StorageError>;
}
