// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback invoked by the voice framework after each user turn.

use async_trait::async_trait;

use crate::types::ChatItem;

/// Decides the chat context the model sees after the user finishes speaking.
#[async_trait]
pub trait TurnHandler: Send + Sync {
    /// `chat` is the current context and `message` the transcribed user turn.
    /// The returned items replace the model's chat context.
    async fn on_user_turn_completed(&self, chat: Vec<ChatItem>, message: &ChatItem)
    -> Vec<ChatItem>;
}
