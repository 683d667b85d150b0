// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sabius check` command implementation.
//!
//! Reports on the loaded configuration, the knowledge directories and the
//! credentials the voice session needs.

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use sabius_config::{ConfigError, SabiusConfig, resolve_credentials_with};
use sabius_knowledge::RelevanceScorer;

/// Status of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Run every check. `lookup` resolves environment variables.
pub fn run_checks(
    config: &SabiusConfig,
    scorer: &RelevanceScorer,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<CheckResult> {
    let mut results = vec![CheckResult::new(
        "config",
        CheckStatus::Pass,
        format!("valid (agent.name={})", config.agent.name),
    )];

    results.push(check_dir("context_dir", &config.knowledge.context_dir));
    results.push(check_dir(
        "knowledge_base_dir",
        &config.knowledge.knowledge_base_dir,
    ));

    let store = scorer.store();
    results.push(if store.is_empty() {
        CheckResult::new("knowledge", CheckStatus::Warn, "no entries loaded")
    } else {
        CheckResult::new(
            "knowledge",
            CheckStatus::Pass,
            format!("{} entries, {} keywords", store.len(), scorer.index().len()),
        )
    });

    if let Some(id) = config.knowledge.fallback() {
        results.push(if scorer.fallback_entry().is_some() {
            CheckResult::new("fallback", CheckStatus::Pass, format!("entry `{id}` present"))
        } else {
            CheckResult::new(
                "fallback",
                CheckStatus::Warn,
                format!("entry `{id}` not found, unmatched queries get no context"),
            )
        });
    }

    match resolve_credentials_with(config, lookup) {
        Ok(_) => results.push(CheckResult::new(
            "credentials",
            CheckStatus::Pass,
            "model and room credentials set",
        )),
        Err(errors) => {
            for error in errors {
                let message = match &error {
                    ConfigError::MissingCredential { env_var, config_key } => {
                        format!("{env_var} not set (or `{config_key}` in sabius.toml)")
                    }
                    other => other.to_string(),
                };
                results.push(CheckResult::new("credentials", CheckStatus::Fail, message));
            }
        }
    }

    results
}

fn check_dir(name: &str, dir: &str) -> CheckResult {
    if Path::new(dir).is_dir() {
        CheckResult::new(name, CheckStatus::Pass, dir)
    } else {
        CheckResult::new(name, CheckStatus::Warn, format!("{dir} does not exist"))
    }
}

/// Print results; returns the number of failures.
pub fn print_results(results: &[CheckResult], plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();

    println!();
    println!("  sabius check");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in results {
        let symbol = match result.status {
            CheckStatus::Pass => "[OK]",
            CheckStatus::Warn => {
                warn_count += 1;
                "[WARN]"
            }
            CheckStatus::Fail => {
                fail_count += 1;
                "[FAIL]"
            }
        };
        let symbol = if use_color {
            match result.status {
                CheckStatus::Pass => symbol.green().to_string(),
                CheckStatus::Warn => symbol.yellow().to_string(),
                CheckStatus::Fail => symbol.red().to_string(),
            }
        } else {
            symbol.to_string()
        };
        println!("  {symbol:<6} {:<20} {}", result.name, result.message);
    }

    println!("  {}", "-".repeat(50));
    println!(
        "  {} checks, {} warnings, {} failures",
        results.len(),
        warn_count,
        fail_count
    );
    println!();
    fail_count
}
