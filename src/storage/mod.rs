// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Append-only bitemporal version storage.
//!
//! This module owns the key and value codecs and the version store: an
//! append-only mapping from encoded [`BitemporalKey`]s to [`ValueEnvelope`]s,
//! with durability and commit atomicity delegated to the RocksDB substrate.
//!
//! # Key Concepts
//!
//! Every write appends a new [`VersionRecord`]; nothing is mutated in place.
//! A record carries two time axes: `valid_from` says when the fact became
//! true in the modeled world, `tx_id` says which commit recorded it. Within
//! one (partition, user key), the substrate's byte order equals ascending
//! (valid_from, tx_id) order, so range cursors walk version chains in time
//! order for free.
//!
//! Logical deletion appends a `Tombstone`-tagged record; physical removal is
//! reserved for the GC manager.
//!
//! # Example
//!
//! ```no_run
//! use eradb::storage::{
//!     BitemporalKey, RocksVersionStore, ValueEnvelope, VersionRecord, VersionStore,
//! };
//! use std::path::Path;
//!
//! let store = RocksVersionStore::open(Path::new("/tmp/versions")).unwrap();
//!
//! let record = VersionRecord::new(
//!     BitemporalKey::new(0, b"sensor/1".to_vec(), 1_000_000, 1),
//!     ValueEnvelope::raw(b"21.5C".to_vec()),
//! );
//! store.append(vec![record]).unwrap();
//!
//! let latest = store.get_latest(0, b"sensor/1").unwrap();
//! println!("latest: {:?}", latest);
//! ```

mod error;
mod key;
mod rocks;
mod store;
mod value;

pub use error::StorageError;
pub use key::{
    decode_key, encode_key, extract_user_key, user_key_prefix, user_key_prefix_end, BitemporalKey,
};
pub use rocks::{DurabilityMode, RocksVersionStore};
pub use store::{VersionScan, VersionStore};
pub use value::{
    decode_value, encode_value, TypeTag, ValueEnvelope, VersionRecord, MAX_KEY_SIZE,
    MAX_VALUE_SIZE,
};
