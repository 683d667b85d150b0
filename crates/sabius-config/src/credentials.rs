// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution for the voice session.
//!
//! Each credential may come from the config file or from its conventional
//! environment variable; the config value wins.

use crate::diagnostic::ConfigError;
use crate::model::SabiusConfig;

/// Credentials required to open a voice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub model_api_key: String,
    pub room_api_key: String,
    pub room_api_secret: String,
}

/// Resolve credentials from config and the process environment.
pub fn resolve_credentials(config: &SabiusConfig) -> Result<Credentials, Vec<ConfigError>> {
    resolve_credentials_with(config, |name| std::env::var(name).ok())
}

/// Resolve credentials using `lookup` for environment variables.
pub fn resolve_credentials_with(
    config: &SabiusConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut resolve = |configured: &Option<String>, env_var: &str, config_key: &str| {
        let value = configured
            .clone()
            .or_else(|| lookup(env_var))
            .filter(|v| !v.trim().is_empty());
        if value.is_none() {
            errors.push(ConfigError::MissingCredential {
                env_var: env_var.to_string(),
                config_key: config_key.to_string(),
            });
        }
        value.unwrap_or_default()
    };

    let credentials = Credentials {
        model_api_key: resolve(&config.realtime.api_key, "OPENAI_API_KEY", "realtime.api_key"),
        room_api_key: resolve(&config.room.api_key, "LIVEKIT_API_KEY", "room.api_key"),
        room_api_secret: resolve(
            &config.room.api_secret,
            "LIVEKIT_API_SECRET",
            "room.api_secret",
        ),
    };

    if errors.is_empty() {
        Ok(credentials)
    } else {
        Err(errors)
    }
}
