// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the knowledge, context and agent crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a single chat item in the conversation context.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One item of the chat context handed to the real-time model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatItem {
    pub role: ChatRole,
    pub text: String,
}

impl ChatItem {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(ChatRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }
}

/// Connection state of the voice room as reported by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Reconnecting,
    Disconnected,
}

/// Health status reported by session health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Session is fully operational.
    Healthy,
    /// Session is operational but experiencing issues.
    Degraded(String),
    /// Session is not operational.
    Unhealthy(String),
}

/// Parameters used to create a real-time model instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub model: String,
    pub voice: String,
    pub temperature: f32,
    pub max_response_tokens: u32,
}
