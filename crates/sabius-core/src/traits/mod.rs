// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for the external voice-agent framework.
//!
//! Audio transport, speech recognition and synthesis live behind these
//! traits. The assistant only decides what instructions and chat context
//! the framework receives, and when to reconnect.

pub mod realtime;
pub mod room;
pub mod turn;

pub use realtime::{RealtimeConnector, RealtimeModel, VoiceSession};
pub use room::VoiceRoom;
pub use turn::TurnHandler;
