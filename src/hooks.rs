// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Hook shapes for layers above the temporal core.
//!
//! The core defines these traits but never calls them: an embedding host
//! (say, one running user code in a sandbox) wires implementations into its
//! own commit path or projection pipeline. Keeping only the shape here means
//! the core carries no dependency on any execution environment.

use crate::storage::VersionRecord;

/// Observes committed changes to a user key.
pub trait CommitHook: Send + Sync {
    /// Called by a host after a commit, with the previously current version
    /// (if any) and the newly committed one.
    fn on_commit(
        &self,
        partition: u32,
        user_key: &[u8],
        before: Option<&VersionRecord>,
        after: &VersionRecord,
    );
}

/// Transforms version records, e.g. for a derived projection.
pub trait VersionMapper: Send + Sync {
    /// Maps a record to its projected form.
    fn map(&self, record: VersionRecord) -> VersionRecord;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BitemporalKey, ValueEnvelope};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHook {
        calls: AtomicUsize,
    }

    impl CommitHook for CountingHook {
        fn on_commit(
            &self,
            _partition: u32,
            _user_key: &[u8],
            _before: Option<&VersionRecord>,
            _after: &VersionRecord,
        ) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct UppercaseMapper;

    impl VersionMapper for UppercaseMapper {
        fn map(&self, mut record: VersionRecord) -> VersionRecord {
            record.value.payload.make_ascii_uppercase();
            record
        }
    }

    #[test]
    fn test_hook_shapes_are_implementable() {
        let record = VersionRecord::new(
            BitemporalKey::new(0, b"k".to_vec(), 1, 1),
            ValueEnvelope::raw(b"abc".to_vec()),
        );

        let hook = CountingHook {
            calls: AtomicUsize::new(0),
        };
        hook.on_commit(0, b"k", None, &record);
        assert_eq!(hook.calls.load(Ordering::Relaxed), 1);

        let mapped = UppercaseMapper.map(record);
        assert_eq!(mapped.value.payload, b"ABC");
    }
}
