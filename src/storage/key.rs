// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Bitemporal key encoding and decoding.
//!
//! Encodes the four-part identity (partition, user key, valid time,
//! transaction id) for substrate storage.
//! Format: `[partition:u32 BE][key_len:u32 BE][key bytes][valid_from:u64 BE][tx_id:u64 BE]`
//!
//! The user key carries a length prefix rather than a delimiter so that a key
//! which is a prefix of another can never collide with it in the sort order.
//! Big-endian fields make lexicographic byte order equal tuple order: within
//! one (partition, user key), versions sort ascending by (valid_from, tx_id).

use std::cmp::Ordering;

use super::StorageError;

/// Bytes before the user key: partition + key length.
const HEADER_LEN: usize = 8;
/// Bytes after the user key: valid_from + tx_id.
const SUFFIX_LEN: usize = 16;

/// The four-part identity of one version of one fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitemporalKey {
    /// Namespace for unrelated key spaces.
    pub partition: u32,
    /// Caller-supplied key bytes, opaque to the engine.
    pub user_key: Vec<u8>,
    /// Valid time: when the fact became true, microseconds.
    pub valid_from: u64,
    /// Transaction time: the commit that recorded the fact.
    pub tx_id: u64,
}

impl BitemporalKey {
    /// Creates a new key.
    pub fn new(partition: u32, user_key: impl Into<Vec<u8>>, valid_from: u64, tx_id: u64) -> Self {
        Self {
            partition,
            user_key: user_key.into(),
            valid_from,
            tx_id,
        }
    }
}

impl PartialOrd for BitemporalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitemporalKey {
    /// Matches encoded byte order exactly: partition, then user-key length,
    /// then user-key bytes, then (valid_from, tx_id). The length comes before
    /// the bytes because the encoding carries a length prefix.
    fn cmp(&self, other: &Self) -> Ordering {
        self.partition
            .cmp(&other.partition)
            .then_with(|| self.user_key.len().cmp(&other.user_key.len()))
            .then_with(|| self.user_key.cmp(&other.user_key))
            .then_with(|| self.valid_from.cmp(&other.valid_from))
            .then_with(|| self.tx_id.cmp(&other.tx_id))
    }
}

/// Encodes a bitemporal key into a substrate key.
///
/// Format: `[partition:u32 BE][key_len:u32 BE][key bytes][valid_from:u64 BE][tx_id:u64 BE]`
#[inline]
pub fn encode_key(key: &BitemporalKey) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(HEADER_LEN + key.user_key.len() + SUFFIX_LEN);

    encoded.extend_from_slice(&key.partition.to_be_bytes());
    encoded.extend_from_slice(&(key.user_key.len() as u32).to_be_bytes());
    encoded.extend_from_slice(&key.user_key);
    encoded.extend_from_slice(&key.valid_from.to_be_bytes());
    encoded.extend_from_slice(&key.tx_id.to_be_bytes());

    encoded
}

/// Decodes a substrate key back into a bitemporal key.
pub fn decode_key(encoded: &[u8]) -> Result<BitemporalKey, StorageError> {
    if encoded.len() < HEADER_LEN {
        return Err(StorageError::InvalidKeyEncoding(
            "key too short for header".to_string(),
        ));
    }

    let partition = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
    let key_len = u32::from_be_bytes([encoded[4], encoded[5], encoded[6], encoded[7]]) as usize;

    let expected_len = HEADER_LEN + key_len + SUFFIX_LEN;
    if encoded.len() != expected_len {
        return Err(StorageError::InvalidKeyEncoding(format!(
            "expected {} bytes, got {}",
            expected_len,
            encoded.len()
        )));
    }

    let user_key = encoded[HEADER_LEN..HEADER_LEN + key_len].to_vec();

    let ts_offset = HEADER_LEN + key_len;
    let mut valid_from_bytes = [0u8; 8];
    valid_from_bytes.copy_from_slice(&encoded[ts_offset..ts_offset + 8]);
    let mut tx_id_bytes = [0u8; 8];
    tx_id_bytes.copy_from_slice(&encoded[ts_offset + 8..ts_offset + 16]);

    Ok(BitemporalKey {
        partition,
        user_key,
        valid_from: u64::from_be_bytes(valid_from_bytes),
        tx_id: u64::from_be_bytes(tx_id_bytes),
    })
}

/// Returns the prefix shared by all versions of one user key.
///
/// Every encoded version of (partition, user_key) starts with these bytes,
/// so the prefix drives the substrate range cursor for version scans.
#[inline]
pub fn user_key_prefix(partition: u32, user_key: &[u8]) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(HEADER_LEN + user_key.len());
    prefix.extend_from_slice(&partition.to_be_bytes());
    prefix.extend_from_slice(&(user_key.len() as u32).to_be_bytes());
    prefix.extend_from_slice(user_key);
    prefix
}

/// Returns the inclusive upper bound of a user key's version range:
/// the prefix followed by maximal (valid_from, tx_id).
#[inline]
pub fn user_key_prefix_end(partition: u32, user_key: &[u8]) -> Vec<u8> {
    let mut end = user_key_prefix(partition, user_key);
    end.extend_from_slice(&[0xFF; SUFFIX_LEN]);
    end
}

/// Extracts the (partition, user key) portion of an encoded key without
/// full decoding.
#[inline]
pub fn extract_user_key(encoded: &[u8]) -> Result<(u32, &[u8]), StorageError> {
    if encoded.len() < HEADER_LEN {
        return Err(StorageError::InvalidKeyEncoding(
            "key too short for header".to_string(),
        ));
    }

    let partition = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
    let key_len = u32::from_be_bytes([encoded[4], encoded[5], encoded[6], encoded[7]]) as usize;

    if encoded.len() < HEADER_LEN + key_len {
        return Err(StorageError::InvalidKeyEncoding(
            "key too short for user key".to_string(),
        ));
    }

    Ok((partition, &encoded[HEADER_LEN..HEADER_LEN + key_len]))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = BitemporalKey> {
        (
            any::<u32>(),
            prop::collection::vec(any::<u8>(), 0..100),
            any::<u64>(),
            any::<u64>(),
        )
            .prop_map(|(partition, user_key, valid_from, tx_id)| BitemporalKey {
                partition,
                user_key,
                valid_from,
                tx_id,
            })
    }

    proptest! {
        #[test]
        fn key_roundtrip(key in arb_key()) {
            let encoded = encode_key(&key);
            let decoded = decode_key(&encoded).unwrap();
            prop_assert_eq!(key, decoded);
        }

        #[test]
        fn byte_order_equals_tuple_order(a in arb_key(), b in arb_key()) {
            let ea = encode_key(&a);
            let eb = encode_key(&b);
            prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
        }

        #[test]
        fn versions_of_one_key_sort_by_time_then_tx(
            partition in any::<u32>(),
            user_key in prop::collection::vec(any::<u8>(), 0..50),
            a in (any::<u64>(), any::<u64>()),
            b in (any::<u64>(), any::<u64>()),
        ) {
            let ka = BitemporalKey::new(partition, user_key.clone(), a.0, a.1);
            let kb = BitemporalKey::new(partition, user_key, b.0, b.1);
            prop_assert_eq!(
                encode_key(&ka).cmp(&encode_key(&kb)),
                (a.0, a.1).cmp(&(b.0, b.1))
            );
        }

        #[test]
        fn prefix_is_prefix(key in arb_key()) {
            let encoded = encode_key(&key);
            let prefix = user_key_prefix(key.partition, &key.user_key);
            prop_assert!(encoded.starts_with(&prefix));
            prop_assert!(encoded <= user_key_prefix_end(key.partition, &key.user_key));
        }
    }
}
