// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sabius.toml` > `~/.config/sabius/sabius.toml` > `/etc/sabius/sabius.toml`
//! with environment variable overrides via `SABIUS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SabiusConfig;

/// Config sections addressable through `SABIUS_<SECTION>_<KEY>` variables.
const SECTIONS: &[&str] = &[
    "agent",
    "knowledge",
    "realtime",
    "room",
    "timeouts",
    "retry",
    "session",
];

const SYSTEM_CONFIG: &str = "/etc/sabius/sabius.toml";
const LOCAL_CONFIG: &str = "sabius.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sabius/sabius.toml` (system-wide)
/// 3. `~/.config/sabius/sabius.toml` (user XDG config)
/// 4. `./sabius.toml` (local directory)
/// 5. `SABIUS_*` environment variables
pub fn load_config() -> Result<SabiusConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SabiusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SabiusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SabiusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SabiusConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SabiusConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

pub(crate) fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("sabius/sabius.toml"))
}

pub(crate) fn system_config_path() -> &'static Path {
    Path::new(SYSTEM_CONFIG)
}

pub(crate) fn local_config_path() -> &'static Path {
    Path::new(LOCAL_CONFIG)
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SABIUS_KNOWLEDGE_MAX_SECTIONS` must map to
/// `knowledge.max_sections`, not `knowledge.max.sections`.
fn env_provider() -> Env {
    Env::prefixed("SABIUS_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
