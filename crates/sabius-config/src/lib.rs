// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Sabius assistant.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, named timeout presets,
//! and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use sabius_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Knowledge dir: {}", config.knowledge.context_dir);
//! ```

pub mod credentials;
pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod presets;
pub mod validation;

use std::path::Path;

pub use credentials::{Credentials, resolve_credentials, resolve_credentials_with};
pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SabiusConfig;
pub use presets::{QueryKind, TimeoutPreset};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors are converted into miette diagnostics with typo
/// suggestions; validation errors are collected, not fail-fast.
pub fn load_and_validate() -> Result<SabiusConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file path (plus env) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<SabiusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SabiusConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<SabiusConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<SabiusConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                context_dir = %config.knowledge.context_dir,
                max_sections = config.knowledge.max_sections,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = loader::local_config_path();
    let local_display = std::env::current_dir()
        .map(|d| d.join(local).display().to_string())
        .unwrap_or_else(|_| local.display().to_string());

    let candidates = [
        Some((local.to_path_buf(), local_display)),
        loader::user_config_path().map(|p| {
            let display = p.display().to_string();
            (p, display)
        }),
        Some((
            loader::system_config_path().to_path_buf(),
            loader::system_config_path().display().to_string(),
        )),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|(path, display)| {
            std::fs::read_to_string(path)
                .ok()
                .map(|content| (display, content))
        })
        .collect()
}
