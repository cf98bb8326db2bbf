// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Garbage collection error types.

use crate::storage::StorageError;

/// Errors that can occur during a garbage collection pass.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// The pass attempted to purge a version still visible to an open
    /// snapshot. This is a programming error in retention computation, never
    /// a soft warning: the pass aborts without deleting anything.
    #[error(
        "gc invariant violation: attempted to purge tx {tx_id} at or above low-water-mark {low_water_mark}"
    )]
    InvariantViolation { tx_id: u64, low_water_mark: u64 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
