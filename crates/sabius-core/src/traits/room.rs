// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice room trait.

use async_trait::async_trait;

use crate::error::SabiusError;
use crate::types::ConnectionState;

/// A room of the voice framework the assistant joins.
#[async_trait]
pub trait VoiceRoom: Send + Sync {
    /// Room name, used for logging only.
    fn name(&self) -> &str;

    /// Current connection state.
    fn connection_state(&self) -> ConnectionState;

    /// Connects (or reconnects) to the room.
    async fn connect(&self) -> Result<(), SabiusError>;
}
