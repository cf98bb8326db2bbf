// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction id allocation.
//!
//! Transaction ids are allocated at commit time, so id order equals commit
//! order. The allocator is an explicit object with an injected starting
//! value, never a process-global singleton; the single writer lock serializes
//! `reserve`/`publish`, and readers only ever load the committed watermark.

use std::sync::atomic::{AtomicU64, Ordering};

/// Allocates strictly increasing transaction ids and tracks the last one
/// whose commit became durable.
///
/// `reserve` hands the writer `last_committed + 1` without advancing
/// anything; `publish` advances the watermark once the substrate commit has
/// succeeded. An aborted writer simply never publishes, so the next writer
/// reuses the same reservation and committed ids stay gap-free. Callers of
/// `reserve`/`publish` must hold the writer lock.
#[derive(Debug)]
pub struct TxIdAllocator {
    last_committed: AtomicU64,
}

impl TxIdAllocator {
    /// Creates an allocator whose next reserved id is `start + 1`.
    pub fn new(start: u64) -> Self {
        Self {
            last_committed: AtomicU64::new(start),
        }
    }

    /// Returns the id the current writer will commit under.
    #[inline]
    pub fn reserve(&self) -> u64 {
        self.last_committed.load(Ordering::Acquire) + 1
    }

    /// Advances the committed watermark after a durable commit.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `tx_id` is not the current reservation;
    /// that would mean two writers ran concurrently.
    #[inline]
    pub fn publish(&self, tx_id: u64) {
        let prev = self.last_committed.swap(tx_id, Ordering::AcqRel);
        debug_assert_eq!(prev + 1, tx_id, "tx ids must advance by exactly one");
    }

    /// Returns the newest committed transaction id: the visibility horizon
    /// a fresh snapshot captures.
    #[inline]
    pub fn last_committed(&self) -> u64 {
        self.last_committed.load(Ordering::Acquire)
    }
}

impl Default for TxIdAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}
