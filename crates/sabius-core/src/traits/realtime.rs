// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Real-time model and voice session traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SabiusError;
use crate::traits::room::VoiceRoom;
use crate::traits::turn::TurnHandler;
use crate::types::{HealthStatus, ModelSpec};

/// Factory for real-time model instances.
///
/// Creation talks to the model provider and may fail with
/// [`SabiusError::Connection`], in which case callers retry with backoff.
#[async_trait]
pub trait RealtimeConnector: Send + Sync {
    async fn create_model(&self, spec: &ModelSpec) -> Result<Box<dyn RealtimeModel>, SabiusError>;
}

/// A created real-time model, ready to be bound to a room.
#[async_trait]
pub trait RealtimeModel: Send + Sync {
    /// Starts a voice session in `room` with the given system instructions.
    ///
    /// The framework calls `handler` after every completed user turn and
    /// installs the chat context it returns.
    async fn start_session(
        &self,
        room: &dyn VoiceRoom,
        instructions: &str,
        handler: Arc<dyn TurnHandler>,
    ) -> Result<Box<dyn VoiceSession>, SabiusError>;
}

/// A running voice session.
#[async_trait]
pub trait VoiceSession: Send + Sync {
    /// Asks the model to speak, steered by one-off instructions.
    async fn generate_reply(&self, instructions: &str) -> Result<(), SabiusError>;

    /// Reports whether the session is still usable.
    async fn health_check(&self) -> Result<HealthStatus, SabiusError>;

    /// Stops the session and releases framework resources.
    async fn stop(&self) -> Result<(), SabiusError>;
}
