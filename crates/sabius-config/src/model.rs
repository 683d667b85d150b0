// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sabius assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::presets::{QueryKind, TimeoutPreset};

/// Top-level Sabius configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SabiusConfig {
    /// Assistant identity and prompt settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Knowledge data locations and selection settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Real-time model settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Voice room credentials.
    #[serde(default)]
    pub room: RoomConfig,

    /// Response and connection timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Retry policy for external connections.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Per-turn chat context settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Assistant identity and prompt configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system prompt preamble. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a markdown file containing the system prompt preamble.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Instructions for the greeting spoken when a session starts.
    #[serde(default = "default_greeting_instructions")]
    pub greeting_instructions: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            greeting_instructions: default_greeting_instructions(),
        }
    }
}

fn default_agent_name() -> String {
    "Sabius".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_greeting_instructions() -> String {
    "Saluda brevemente al usuario e introduce el ConvergenceLab".to_string()
}

/// Knowledge store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Directory of `*.json` context files, one entry per file.
    #[serde(default = "default_context_dir")]
    pub context_dir: String,

    /// Directory holding the faculty and research knowledge-base files.
    #[serde(default = "default_knowledge_base_dir")]
    pub knowledge_base_dir: String,

    /// Maximum number of entries injected per turn.
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,

    /// Entry used when no keyword matches. An empty string disables the fallback.
    #[serde(default = "default_fallback_entry")]
    pub fallback_entry: String,
}

impl KnowledgeConfig {
    /// The fallback entry id, if one is configured.
    pub fn fallback(&self) -> Option<&str> {
        let id = self.fallback_entry.trim();
        (!id.is_empty()).then_some(id)
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            context_dir: default_context_dir(),
            knowledge_base_dir: default_knowledge_base_dir(),
            max_sections: default_max_sections(),
            fallback_entry: default_fallback_entry(),
        }
    }
}

fn default_context_dir() -> String {
    "scraped_data/context".to_string()
}

fn default_knowledge_base_dir() -> String {
    "knowledge_base".to_string()
}

fn default_max_sections() -> usize {
    3
}

fn default_fallback_entry() -> String {
    "core".to_string()
}

/// Real-time model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RealtimeConfig {
    /// Model provider API key. `None` falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Real-time model identifier.
    #[serde(default = "default_realtime_model")]
    pub model: String,

    /// Voice used for speech synthesis.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_realtime_model(),
            voice: default_voice(),
            temperature: default_temperature(),
        }
    }
}

fn default_realtime_model() -> String {
    "gpt-4o-realtime-preview".to_string()
}

fn default_voice() -> String {
    "ash".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

/// Voice room configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    /// Voice server URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Room API key. `None` falls back to `LIVEKIT_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Room API secret. `None` falls back to `LIVEKIT_API_SECRET`.
    #[serde(default)]
    pub api_secret: Option<String>,
}

/// Timeout configuration. A `preset` replaces every response timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Named preset applied over the explicit values below.
    #[serde(default)]
    pub preset: Option<TimeoutPreset>,

    #[serde(default = "default_greeting_secs")]
    pub greeting_secs: f64,

    #[serde(default = "default_simple_query_secs")]
    pub simple_query_secs: f64,

    #[serde(default = "default_complex_query_secs")]
    pub complex_query_secs: f64,

    #[serde(default = "default_knowledge_query_secs")]
    pub knowledge_query_secs: f64,

    /// Maximum tokens per spoken response.
    #[serde(default = "default_max_response_tokens")]
    pub max_response_tokens: u32,

    /// Silence before the model starts answering.
    #[serde(default = "default_silence_duration_ms")]
    pub silence_duration_ms: u64,

    /// Voice activity detection threshold (0.0 to 1.0).
    #[serde(default = "default_vad_threshold")]
    pub vad_threshold: f64,

    /// Interval between session health checks.
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: f64,

    /// Timeout for establishing a room connection.
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: f64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            preset: None,
            greeting_secs: default_greeting_secs(),
            simple_query_secs: default_simple_query_secs(),
            complex_query_secs: default_complex_query_secs(),
            knowledge_query_secs: default_knowledge_query_secs(),
            max_response_tokens: default_max_response_tokens(),
            silence_duration_ms: default_silence_duration_ms(),
            vad_threshold: default_vad_threshold(),
            health_check_interval_secs: default_health_check_interval_secs(),
            connection_timeout_secs: default_connection_timeout_secs(),
        }
    }
}

impl TimeoutConfig {
    /// Returns the values in effect after applying `preset`, if any.
    pub fn effective(&self) -> TimeoutConfig {
        match self.preset {
            Some(preset) => {
                let values = preset.values();
                TimeoutConfig {
                    preset: self.preset,
                    greeting_secs: values.greeting_secs,
                    simple_query_secs: values.simple_query_secs,
                    complex_query_secs: values.complex_query_secs,
                    knowledge_query_secs: values.knowledge_query_secs,
                    max_response_tokens: values.max_response_tokens,
                    silence_duration_ms: values.silence_duration_ms,
                    vad_threshold: values.vad_threshold,
                    health_check_interval_secs: self.health_check_interval_secs,
                    connection_timeout_secs: self.connection_timeout_secs,
                }
            }
            None => self.clone(),
        }
    }

    /// Response timeout for a kind of query, with the preset applied.
    pub fn timeout_for(&self, kind: QueryKind) -> Duration {
        let effective = self.effective();
        let secs = match kind {
            QueryKind::Greeting => effective.greeting_secs,
            QueryKind::Simple => effective.simple_query_secs,
            QueryKind::Complex => effective.complex_query_secs,
            QueryKind::Knowledge => effective.knowledge_query_secs,
        };
        seconds(secs)
    }

    /// Response timeout looked up by name; unknown names use the simple timeout.
    pub fn timeout_for_name(&self, kind: &str) -> Duration {
        self.timeout_for(kind.parse().unwrap_or(QueryKind::Simple))
    }

    pub fn health_check_interval(&self) -> Duration {
        seconds(self.health_check_interval_secs)
    }

    pub fn connection_timeout(&self) -> Duration {
        seconds(self.connection_timeout_secs)
    }
}

/// Upper bound accepted for any `[timeouts]` value, in seconds.
pub const MAX_TIMEOUT_SECS: f64 = 3600.0;

/// Converts config seconds, clamped to `MAX_TIMEOUT_SECS`; values that are
/// not representable become zero.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.min(MAX_TIMEOUT_SECS)).unwrap_or(Duration::ZERO)
}

fn default_greeting_secs() -> f64 {
    10.0
}

fn default_simple_query_secs() -> f64 {
    10.0
}

fn default_complex_query_secs() -> f64 {
    25.0
}

fn default_knowledge_query_secs() -> f64 {
    20.0
}

pub(crate) fn default_max_response_tokens() -> u32 {
    2048
}

fn default_silence_duration_ms() -> u64 {
    1000
}

pub(crate) fn default_vad_threshold() -> f64 {
    0.3
}

fn default_health_check_interval_secs() -> f64 {
    30.0
}

fn default_connection_timeout_secs() -> f64 {
    10.0
}

/// Retry policy for model creation and session recovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Upper bound for any single delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Chat context handling for each completed user turn.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of most recent chat items kept in the model context.
    #[serde(default = "default_max_chat_items")]
    pub max_chat_items: usize,

    /// Maximum characters of relevant context injected as a system item.
    #[serde(default = "default_extra_context_chars")]
    pub extra_context_chars: usize,

    /// Relevant context at or below this length is not injected.
    #[serde(default = "default_min_extra_context_chars")]
    pub min_extra_context_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_chat_items: default_max_chat_items(),
            extra_context_chars: default_extra_context_chars(),
            min_extra_context_chars: default_min_extra_context_chars(),
        }
    }
}

fn default_max_chat_items() -> usize {
    15
}

fn default_extra_context_chars() -> usize {
    2000
}

fn default_min_extra_context_chars() -> usize {
    100
}
