// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! EraDB: an embedded bitemporal versioning engine over an ordered
//! transactional substrate
//!
//! Every write appends an immutable version addressed by both valid time
//! (when a fact is true in the modeled world) and transaction time (when
//! the database learned it). Queries answer "what was true at time T, as
//! known at transaction X"; corrections never destroy history, and a
//! retention policy plus garbage collection bound the version chains.

pub mod clock;
pub mod db;
pub mod gc;
pub mod hooks;
pub mod query;
pub mod storage;
pub mod txn;

pub use clock::{Clock, ManualClock, SystemClock, TxIdAllocator};
pub use db::EraDb;
pub use gc::{GcError, GcManager, GcStats, RetentionPolicy};
pub use hooks::{CommitHook, VersionMapper};
pub use query::{
    get_as_of_transaction, get_as_of_valid, get_between_valid, get_versions_between_tx,
};
pub use storage::{
    BitemporalKey, DurabilityMode, RocksVersionStore, StorageError, TypeTag, ValueEnvelope,
    VersionRecord, VersionScan, VersionStore,
};
pub use txn::{MvccManager, Snapshot, SnapshotRegistry, TxnError, WriteTxn};
