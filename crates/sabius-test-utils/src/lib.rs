// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sabius integration tests.
//!
//! Provides mock framework adapters, knowledge fixtures, and a harness that
//! wires the full assistant stack without any network access:
//! - [`MockConnector`] / [`SessionScript`]: scripted real-time sessions
//! - [`MockRoom`]: voice room with a controllable connection state
//! - [`KnowledgeFixture`]: JSON data in a temporary directory
//! - [`TestHarness`]: the assembled stack

pub mod fixtures;
pub mod harness;
pub mod mock_realtime;
pub mod mock_room;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use fixtures::KnowledgeFixture;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_realtime::{Failure, MockConnector, SessionRecord, SessionScript};
pub use mock_room::MockRoom;

/// Lock a mock's state, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
