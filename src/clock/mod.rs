// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Clock injection and transaction id allocation.
//!
//! Two concerns live here: valid-time defaults come from an injected
//! [`Clock`], and transaction ids come from the [`TxIdAllocator`], whose
//! committed watermark defines snapshot visibility. Both are plain objects
//! handed to the MVCC manager at construction; there is no ambient global
//! state.

mod allocator;
mod clock;

pub use allocator::TxIdAllocator;
pub use clock::{Clock, ManualClock, SystemClock};
