// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Value envelopes and version records.
//!
//! Persisted layout: one type-tag byte followed by the raw payload. The
//! payload is opaque to the temporal engine; the tag tells higher layers how
//! to interpret it. A `Tombstone` tag records logical deletion without
//! erasing history.

use super::key::BitemporalKey;
use super::StorageError;

/// Maximum user-key size in bytes.
pub const MAX_KEY_SIZE: usize = 8 * 1024; // 8KB

/// Maximum payload size in bytes.
pub const MAX_VALUE_SIZE: usize = 64 * 1024 * 1024; // 64MB

/// Wire tag identifying the payload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Raw = 0x00,
    Json = 0x01,
    MsgPack = 0x02,
    Protobuf = 0x03,
    EdgeRecord = 0x10,
    VectorBlock = 0x20,
    Tombstone = 0xFF,
}

impl TypeTag {
    /// Maps a wire byte back to a tag.
    pub fn from_byte(byte: u8) -> Result<Self, StorageError> {
        match byte {
            0x00 => Ok(Self::Raw),
            0x01 => Ok(Self::Json),
            0x02 => Ok(Self::MsgPack),
            0x03 => Ok(Self::Protobuf),
            0x10 => Ok(Self::EdgeRecord),
            0x20 => Ok(Self::VectorBlock),
            0xFF => Ok(Self::Tombstone),
            other => Err(StorageError::InvalidValueEncoding(format!(
                "unknown type tag 0x{other:02X}"
            ))),
        }
    }
}

/// A typed, opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueEnvelope {
    pub tag: TypeTag,
    pub payload: Vec<u8>,
}

impl ValueEnvelope {
    /// Creates an envelope with the given tag.
    pub fn new(tag: TypeTag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// Creates a raw (untyped bytes) envelope.
    pub fn raw(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(TypeTag::Raw, payload)
    }

    /// Creates a JSON envelope.
    pub fn json(payload: impl Into<Vec<u8>>) -> Self {
        Self::new(TypeTag::Json, payload)
    }

    /// Creates a deletion marker.
    pub fn tombstone() -> Self {
        Self::new(TypeTag::Tombstone, Vec::new())
    }

    /// Returns true if this envelope records a logical deletion.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.tag == TypeTag::Tombstone
    }

    /// Returns the payload length.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns true if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Encodes an envelope as one tag byte plus the payload.
#[inline]
pub fn encode_value(value: &ValueEnvelope) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(1 + value.payload.len());
    encoded.push(value.tag as u8);
    encoded.extend_from_slice(&value.payload);
    encoded
}

/// Decodes stored value bytes back into an envelope.
pub fn decode_value(encoded: &[u8]) -> Result<ValueEnvelope, StorageError> {
    let Some((&tag_byte, payload)) = encoded.split_first() else {
        return Err(StorageError::InvalidValueEncoding(
            "empty value bytes".to_string(),
        ));
    };

    Ok(ValueEnvelope {
        tag: TypeTag::from_byte(tag_byte)?,
        payload: payload.to_vec(),
    })
}

/// One immutable version of one fact: created at commit, never mutated,
/// removed only by garbage collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub key: BitemporalKey,
    pub value: ValueEnvelope,
}

impl VersionRecord {
    /// Creates a record.
    pub fn new(key: BitemporalKey, value: ValueEnvelope) -> Self {
        Self { key, value }
    }

    /// Returns true if this version records a logical deletion.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_tombstone()
    }

    /// Transaction id that committed this version.
    #[inline]
    pub fn tx_id(&self) -> u64 {
        self.key.tx_id
    }

    /// Valid time this version took effect, microseconds.
    #[inline]
    pub fn valid_from(&self) -> u64 {
        self.key.valid_from
    }
}
