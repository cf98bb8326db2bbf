// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction error types.

use crate::storage::StorageError;

/// Errors that can occur in transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TxnError {
    /// A writer is already active. The caller should retry with backoff;
    /// writers are never queued silently without a bound.
    #[error("another write transaction is active")]
    WriterBusy,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
