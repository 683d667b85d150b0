// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for calls to the voice framework and model provider.
//!
//! - [`BackoffPolicy`]: attempts and exponential delays, built from `[retry]` config
//! - [`retry_with_backoff`]: retries connection failures, then gives up
//! - [`with_timeout`]: bounds an operation, mapping expiry to `SabiusError::Timeout`

pub mod backoff;
pub mod retry;
pub mod timeout;

pub use backoff::BackoffPolicy;
pub use retry::retry_with_backoff;
pub use timeout::with_timeout;
