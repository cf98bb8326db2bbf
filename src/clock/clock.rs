// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Injectable clock sources for default valid-time values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of valid-time defaults, in microseconds.
///
/// The engine never reads the wall clock directly; every timestamp flows
/// through an injected `Clock` so that hosts and tests control time.
pub trait Clock: Send + Sync {
    /// Returns the current time in microseconds.
    fn now_micros(&self) -> u64;
}

/// Wall-clock time since the Unix epoch.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

/// A manually driven clock for tests and deterministic hosts.
///
/// Stays where it is put; `advance` moves it forward.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock starting at the given microsecond value.
    pub fn new(start_micros: u64) -> Self {
        Self {
            now: AtomicU64::new(start_micros),
        }
    }

    /// Sets the current time.
    pub fn set(&self, micros: u64) {
        self.now.store(micros, Ordering::Release);
    }

    /// Moves the clock forward.
    pub fn advance(&self, micros: u64) {
        self.now.fetch_add(micros, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let t1 = clock.now_micros();
        let t2 = clock.now_micros();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_micros(), 100);

        clock.advance(50);
        assert_eq!(clock.now_micros(), 150);

        clock.set(42);
        assert_eq!(clock.now_micros(), 42);
    }
}
