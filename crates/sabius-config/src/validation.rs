// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as ranges for temperatures, thresholds and retry factors.

use crate::diagnostic::ConfigError;
use crate::model::{MAX_TIMEOUT_SECS, SabiusConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SabiusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    if config.knowledge.max_sections == 0 {
        fail("knowledge.max_sections must be at least 1".to_string());
    }

    if config.knowledge.context_dir.trim().is_empty() {
        fail("knowledge.context_dir must not be empty".to_string());
    }

    let temperature = config.realtime.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        fail(format!(
            "realtime.temperature must be between 0.0 and 2.0, got {temperature}"
        ));
    }

    let vad = config.timeouts.vad_threshold;
    if !(0.0..=1.0).contains(&vad) {
        fail(format!(
            "timeouts.vad_threshold must be between 0.0 and 1.0, got {vad}"
        ));
    }

    for (key, secs) in [
        ("greeting_secs", config.timeouts.greeting_secs),
        ("simple_query_secs", config.timeouts.simple_query_secs),
        ("complex_query_secs", config.timeouts.complex_query_secs),
        ("knowledge_query_secs", config.timeouts.knowledge_query_secs),
        (
            "health_check_interval_secs",
            config.timeouts.health_check_interval_secs,
        ),
        (
            "connection_timeout_secs",
            config.timeouts.connection_timeout_secs,
        ),
    ] {
        if !secs.is_finite() || secs <= 0.0 {
            fail(format!("timeouts.{key} must be positive, got {secs}"));
        } else if secs > MAX_TIMEOUT_SECS {
            fail(format!(
                "timeouts.{key} must be at most {MAX_TIMEOUT_SECS} seconds, got {secs}"
            ));
        }
    }

    if config.retry.max_attempts == 0 {
        fail("retry.max_attempts must be at least 1".to_string());
    }

    let factor = config.retry.backoff_factor;
    if !factor.is_finite() || factor < 1.0 {
        fail(format!("retry.backoff_factor must be at least 1.0, got {factor}"));
    }

    if config.retry.max_delay_ms < config.retry.initial_delay_ms {
        fail(format!(
            "retry.max_delay_ms ({}) must not be smaller than retry.initial_delay_ms ({})",
            config.retry.max_delay_ms, config.retry.initial_delay_ms
        ));
    }

    if config.session.max_chat_items == 0 {
        fail("session.max_chat_items must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
