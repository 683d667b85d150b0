// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sabius assistant.
//!
//! This crate provides the error type, shared types and the trait seams
//! behind which the external voice framework and real-time model live.

pub mod error;
pub mod traits;
pub mod types;

pub use error::SabiusError;
pub use types::{ChatItem, ChatRole, ConnectionState, HealthStatus, ModelSpec};

pub use traits::{RealtimeConnector, RealtimeModel, TurnHandler, VoiceRoom, VoiceSession};
