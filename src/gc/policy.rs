// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Retention policy configuration.

use std::time::Duration;

/// What a garbage collection pass must keep.
///
/// A version survives if any clause retains it; the clauses are combined
/// with OR, and the snapshot low-water-mark protection applies on top of all
/// of them regardless of policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Always keep this many of the newest versions per key.
    pub keep_versions: usize,
    /// Keep versions whose valid time is within this much of the clock's
    /// current time.
    pub keep_duration: Option<Duration>,
    /// Keep versions committed within this many transactions of the newest
    /// committed transaction id.
    pub keep_tx_window: Option<u64>,
}

impl RetentionPolicy {
    /// A policy that keeps only the newest `n` versions per key.
    pub fn keep_latest(n: usize) -> Self {
        Self {
            keep_versions: n,
            keep_duration: None,
            keep_tx_window: None,
        }
    }

    /// Adds a valid-time recency clause.
    pub fn with_keep_duration(mut self, duration: Duration) -> Self {
        self.keep_duration = Some(duration);
        self
    }

    /// Adds a transaction-window clause.
    pub fn with_keep_tx_window(mut self, window: u64) -> Self {
        self.keep_tx_window = Some(window);
        self
    }
}

impl Default for RetentionPolicy {
    /// Keeps the single newest version per key and nothing else.
    fn default() -> Self {
        Self::keep_latest(1)
    }
}
