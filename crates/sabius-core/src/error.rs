// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sabius assistant.

use thiserror::Error;

/// The primary error type used across the Sabius crates.
#[derive(Debug, Error)]
pub enum SabiusError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A knowledge data file exists but could not be read or parsed.
    #[error("knowledge file {path}: {source}")]
    Knowledge {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Connection to the voice room or the real-time model failed.
    #[error("connection error: {message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The voice session failed for a reason other than connectivity.
    #[error("session error: {message}")]
    Session { message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SabiusError {
    /// Convenience constructor for a connection error without a source.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Returns true when retrying the failed operation may succeed.
    ///
    /// Only connection failures are retried; everything else terminates
    /// the caller immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
