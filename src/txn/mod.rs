// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! MVCC snapshot management: single writer, many lock-free readers.
//!
//! # Key Concepts
//!
//! A reader calls [`MvccManager::begin_read`] and gets a [`Snapshot`]: the
//! last committed transaction id at that instant. Every query bound to the
//! snapshot observes exactly the records committed at or below that horizon,
//! so reads repeat without taking any lock.
//!
//! A writer calls [`MvccManager::begin_write`] and either gets the single
//! process-wide [`WriteTxn`] or [`TxnError::WriterBusy`] to retry with
//! backoff. Records are buffered in the transaction and land in one atomic
//! substrate commit; the transaction id is published to readers only after
//! that commit succeeds. Aborting (or dropping) the transaction discards the
//! buffer, so no partial state ever becomes visible.
//!
//! Open snapshots are tracked in a [`SnapshotRegistry`] whose minimum bound,
//! the low-water-mark, caps what garbage collection may purge.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eradb::clock::{Clock, SystemClock};
//! use eradb::storage::{RocksVersionStore, ValueEnvelope};
//! use eradb::txn::MvccManager;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksVersionStore::open(std::path::Path::new("/tmp/era"))?);
//! let clock = Arc::new(SystemClock) as Arc<dyn Clock>;
//! let manager = MvccManager::new(store, clock);
//!
//! let mut txn = manager.begin_write()?;
//! txn.put(0, b"user/42".to_vec(), ValueEnvelope::json(br#"{"name":"ada"}"#.to_vec()), None);
//! txn.commit()?;
//!
//! let snapshot = manager.begin_read();
//! assert!(snapshot.is_visible(1));
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod snapshot;

pub use error::TxnError;
pub use manager::{MvccManager, WriteTxn};
pub use snapshot::{Snapshot, SnapshotRegistry};
