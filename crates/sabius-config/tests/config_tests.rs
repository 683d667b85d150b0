// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sabius configuration system.

use std::io::Write;
use std::time::Duration;

use sabius_config::diagnostic::ConfigError;
use sabius_config::model::SabiusConfig;
use sabius_config::{
    QueryKind, TimeoutPreset, load_and_validate_path, load_and_validate_str,
    load_config_from_str,
};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sabius_config() {
    let toml = r#"
[agent]
name = "Sabius"
log_level = "debug"
system_prompt = "Eres Sabius."

[knowledge]
context_dir = "/srv/sabius/context"
knowledge_base_dir = "/srv/sabius/kb"
max_sections = 5
fallback_entry = "core"

[realtime]
model = "gpt-4o-realtime-preview"
voice = "alloy"
temperature = 0.8

[room]
url = "wss://voice.example.org"

[timeouts]
preset = "balanced"
health_check_interval_secs = 15.0

[retry]
max_attempts = 5
initial_delay_ms = 500

[session]
max_chat_items = 20
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.system_prompt.as_deref(), Some("Eres Sabius."));
    assert_eq!(config.knowledge.context_dir, "/srv/sabius/context");
    assert_eq!(config.knowledge.max_sections, 5);
    assert_eq!(config.realtime.voice, "alloy");
    assert_eq!(config.room.url.as_deref(), Some("wss://voice.example.org"));
    assert_eq!(config.timeouts.preset, Some(TimeoutPreset::Balanced));
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.backoff_factor, 2.0);
    assert_eq!(config.session.max_chat_items, 20);
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = SabiusConfig::default();
    assert_eq!(config.agent.name, defaults.agent.name);
    assert_eq!(config.knowledge.context_dir, defaults.knowledge.context_dir);
    assert_eq!(config.realtime.model, "gpt-4o-realtime-preview");
}

/// Unknown field produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[knowledge]
max_sectoins = 2
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "max_sectoins");
            assert_eq!(suggestion.as_deref(), Some("max_sections"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[knowledge]
max_sections = "three"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_sections"))),
        "got {errors:?}"
    );
}

/// Unknown preset names are rejected at parse time.
#[test]
fn unknown_preset_is_rejected() {
    let toml = r#"
[timeouts]
preset = "glacial"
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_are_reported() {
    let toml = r#"
[realtime]
temperature = 5.0

[retry]
max_attempts = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Presets drive the per-query timeouts.
#[test]
fn preset_drives_query_timeouts() {
    let toml = r#"
[timeouts]
preset = "thorough"
"#;
    let config = load_and_validate_str(toml).expect("valid");
    assert_eq!(
        config.timeouts.timeout_for(QueryKind::Complex),
        Duration::from_secs(60)
    );
    assert_eq!(config.timeouts.effective().max_response_tokens, 4096);
}

/// Loading from an explicit path works and validates.
#[test]
fn load_from_path() {
    // Inside a jail so env overrides set by other tests cannot leak in.
    figment::Jail::expect_with(|_| {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[knowledge]\nmax_sections = 2").expect("write");
        let config = load_and_validate_path(file.path()).expect("valid file");
        assert_eq!(config.knowledge.max_sections, 2);
        Ok(())
    });
}

/// `SABIUS_*` variables override the file.
#[test]
fn env_var_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("sabius.toml", "[knowledge]\nmax_sections = 2\n")?;
        jail.set_env("SABIUS_KNOWLEDGE_MAX_SECTIONS", "7");
        jail.set_env("SABIUS_AGENT_LOG_LEVEL", "debug");

        let config = load_and_validate_path(std::path::Path::new("sabius.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.knowledge.max_sections, 7);
        assert_eq!(config.agent.log_level, "debug");
        Ok(())
    });
}

/// Env values still go through validation.
#[test]
fn out_of_range_env_var_is_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("sabius.toml", "")?;
        jail.set_env("SABIUS_KNOWLEDGE_MAX_SECTIONS", "0");

        let errors = load_and_validate_path(std::path::Path::new("sabius.toml"))
            .expect_err("zero sections must be rejected");
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::Validation { message } if message.contains("knowledge.max_sections")
        )));
        Ok(())
    });
}

/// Timeouts too large for a `Duration` are rejected at load time.
#[test]
fn huge_timeout_is_rejected() {
    let errors = load_and_validate_str("[timeouts]\ngreeting_secs = 1e30\n")
        .expect_err("timeout above the ceiling must be rejected");
    assert!(errors[0].to_string().contains("timeouts.greeting_secs"));
}

/// `pure` names the knowledge timeout.
#[test]
fn pure_query_kind_uses_knowledge_timeout() {
    let config = load_and_validate_str("[timeouts]\nknowledge_query_secs = 42.0\n").expect("valid");
    assert_eq!(
        config.timeouts.timeout_for_name("pure"),
        Duration::from_secs(42)
    );
}
