// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Retention and garbage collection.
//!
//! Version chains grow forever until a [`GcManager`] pass physically removes
//! what no [`RetentionPolicy`] clause keeps and no open snapshot can still
//! observe. The snapshot low-water-mark is an invariant, not a preference:
//! a pass that would cross it aborts with [`GcError::InvariantViolation`]
//! and deletes nothing.

mod error;
mod manager;
mod policy;

pub use error::GcError;
pub use manager::{GcManager, GcStats};
pub use policy::RetentionPolicy;
