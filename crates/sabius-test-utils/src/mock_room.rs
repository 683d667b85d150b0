// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock voice room with a controllable connection state.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use sabius_core::{ConnectionState, SabiusError, VoiceRoom};

use crate::lock;

/// A room whose connection can be dropped by the test and restored by
/// [`VoiceRoom::connect`].
pub struct MockRoom {
    name: String,
    state: Mutex<ConnectionState>,
    connect_calls: AtomicU32,
    connect_failures: AtomicU32,
}

impl MockRoom {
    /// A connected room named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(ConnectionState::Connected),
            connect_calls: AtomicU32::new(0),
            connect_failures: AtomicU32::new(0),
        }
    }

    /// Simulate the framework losing the room.
    pub fn disconnect(&self) {
        *lock(&self.state) = ConnectionState::Disconnected;
    }

    /// Make the next `n` connect calls fail with a connection error.
    pub fn fail_next_connects(&self, n: u32) {
        self.connect_failures.store(n, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRoom {
    fn default() -> Self {
        Self::new("convergence-lab")
    }
}

#[async_trait]
impl VoiceRoom for MockRoom {
    fn name(&self) -> &str {
        &self.name
    }

    fn connection_state(&self) -> ConnectionState {
        *lock(&self.state)
    }

    async fn connect(&self) -> Result<(), SabiusError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .connect_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(SabiusError::connection("room connect refused"));
        }
        *lock(&self.state) = ConnectionState::Connected;
        Ok(())
    }
}
