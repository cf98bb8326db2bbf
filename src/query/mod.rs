// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Temporal query resolution.
//!
//! Pure, stateless lookups over the version store: what was true at a valid
//! time ([`get_as_of_valid`]), what did we know at a transaction horizon
//! ([`get_as_of_transaction`]), what changed across a valid-time window
//! ([`get_between_valid`]), and what was committed across a transaction
//! window ([`get_versions_between_tx`]). Queries take no locks and have no
//! side effects, so interrupting one between scan steps is always safe.

mod resolver;

pub use resolver::{
    get_as_of_transaction, get_as_of_valid, get_between_valid, get_versions_between_tx,
};
