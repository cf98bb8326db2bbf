// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed version store implementation.

use std::path::Path;

use rocksdb::{DBWithThreadMode, Direction, IteratorMode, MultiThreaded, Options, WriteBatch, WriteOptions};

use super::key::{decode_key, encode_key, user_key_prefix, user_key_prefix_end, BitemporalKey};
use super::value::{decode_value, encode_value, VersionRecord, MAX_KEY_SIZE, MAX_VALUE_SIZE};
use super::{StorageError, VersionScan, VersionStore};

/// Durability mode for write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Writes are synced to WAL but not fsynced to disk.
    /// Durable against process crashes but not power failures.
    /// This is the default mode, balancing performance and safety.
    #[default]
    WalOnly,
    /// Writes are fsynced to disk on every operation.
    /// Durable against power failures but slower.
    FsyncEveryWrite,
}

/// RocksDB-backed version store.
///
/// Version records are stored under encoded bitemporal keys, so the
/// substrate's byte order lays each user key's chain out ascending by
/// (valid_from, tx_id). Batch appends ride on RocksDB's atomic write batch;
/// crash recovery of the last committed state is the substrate's job and a
/// no-op at this layer.
pub struct RocksVersionStore {
    db: DBWithThreadMode<MultiThreaded>,
    write_opts: WriteOptions,
}

impl RocksVersionStore {
    /// Opens or creates a database at the given path.
    ///
    /// Uses `DurabilityMode::WalOnly` by default (fast, durable against process crash).
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with_durability(path, DurabilityMode::default())
    }

    /// Opens or creates a database with the specified durability mode.
    pub fn open_with_durability(
        path: &Path,
        durability: DurabilityMode,
    ) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        // Optimize for an append-mostly workload
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64MB
        opts.set_max_write_buffer_number(4);
        opts.set_target_file_size_base(64 * 1024 * 1024);
        opts.set_level_compaction_dynamic_level_bytes(true);

        // Enable bloom filters for point lookups
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);

        Self::open_with_options(path, opts, durability)
    }

    /// Opens a database with custom RocksDB options.
    pub fn open_with_options(
        path: &Path,
        opts: Options,
        durability: DurabilityMode,
    ) -> Result<Self, StorageError> {
        let db = DBWithThreadMode::open(&opts, path)?;

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(durability == DurabilityMode::FsyncEveryWrite);

        Ok(Self { db, write_opts })
    }

    /// Forces a flush to disk.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    /// Returns the maximum committed transaction id in the store, by full
    /// scan. Used once at open to resume the tx id allocator; zero for an
    /// empty store.
    pub fn max_tx_id(&self) -> Result<u64, StorageError> {
        let mut max = 0u64;

        for item in self.db.iterator(IteratorMode::Start) {
            let (encoded_key, _) = item?;
            let key = decode_key(&encoded_key)?;
            max = max.max(key.tx_id);
        }

        Ok(max)
    }

    /// Validates user-key size.
    fn validate_key(&self, user_key: &[u8]) -> Result<(), StorageError> {
        if user_key.len() > MAX_KEY_SIZE {
            return Err(StorageError::KeyTooLarge {
                size: user_key.len(),
                max: MAX_KEY_SIZE,
            });
        }
        Ok(())
    }

    /// Validates payload size.
    fn validate_value(&self, record: &VersionRecord) -> Result<(), StorageError> {
        if record.value.len() > MAX_VALUE_SIZE {
            return Err(StorageError::ValueTooLarge {
                size: record.value.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        Ok(())
    }
}

impl VersionStore for RocksVersionStore {
    fn append(&self, records: Vec<VersionRecord>) -> Result<(), StorageError> {
        let mut batch = WriteBatch::default();

        for record in &records {
            self.validate_key(&record.key.user_key)?;
            self.validate_value(record)?;

            batch.put(encode_key(&record.key), encode_value(&record.value));
        }

        self.db.write_opt(batch, &self.write_opts)?;
        Ok(())
    }

    fn get_latest(
        &self,
        partition: u32,
        user_key: &[u8],
    ) -> Result<Option<VersionRecord>, StorageError> {
        self.validate_key(user_key)?;

        let prefix = user_key_prefix(partition, user_key);
        let end = user_key_prefix_end(partition, user_key);

        // Seek backwards from the maximal version of this user key; the
        // first hit inside the prefix is the (valid_from, tx_id) maximum.
        let mut iter = self
            .db
            .iterator(IteratorMode::From(&end, Direction::Reverse));

        match iter.next() {
            None => Ok(None),
            Some(item) => {
                let (encoded_key, value) = item?;
                if !encoded_key.starts_with(&prefix) {
                    return Ok(None);
                }
                let key = decode_key(&encoded_key)?;
                let value = decode_value(&value)?;
                Ok(Some(VersionRecord::new(key, value)))
            }
        }
    }

    fn scan_versions(
        &self,
        partition: u32,
        user_key: &[u8],
    ) -> Result<VersionScan<'_>, StorageError> {
        self.validate_key(user_key)?;

        let prefix = user_key_prefix(partition, user_key);
        let mut iter = self
            .db
            .iterator(IteratorMode::From(&prefix, Direction::Forward));
        let mut done = false;

        Ok(Box::new(std::iter::from_fn(move || {
            if done {
                return None;
            }
            match iter.next()? {
                Err(e) => {
                    done = true;
                    Some(Err(e.into()))
                }
                Ok((encoded_key, value)) => {
                    if !encoded_key.starts_with(&prefix) {
                        done = true;
                        return None;
                    }
                    let record = decode_key(&encoded_key).and_then(|key| {
                        let value = decode_value(&value)?;
                        Ok(VersionRecord::new(key, value))
                    });
                    if record.is_err() {
                        done = true;
                    }
                    Some(record)
                }
            }
        })))
    }

    fn remove(&self, keys: &[BitemporalKey]) -> Result<u64, StorageError> {
        let mut removed = 0u64;

        // Delete in batches; deleting an absent key is a no-op.
        for chunk in keys.chunks(1000) {
            let mut batch = WriteBatch::default();
            for key in chunk {
                batch.delete(encode_key(key));
                removed += 1;
            }
            self.db.write_opt(batch, &self.write_opts)?;
        }

        Ok(removed)
    }
}
