// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only commands over the knowledge layer: `prompt`, `search`,
//! `contexts`, `stats` and `catalog`.

use std::fmt::Write;

use sabius_context::{PromptAssembler, PromptStats};
use sabius_core::SabiusError;
use sabius_knowledge::{
    EntrepreneurshipCase, KnowledgeCatalog, KnowledgeStats, KnowledgeStore, RelevanceScorer,
};
use serde_json::Value;

/// The assembled prompt followed by its size figures.
pub fn render_prompt(assembler: &PromptAssembler, query: &str) -> String {
    let prompt = assembler.build_prompt(query);
    let stats = PromptStats::of(&prompt);
    format!(
        "{prompt}\n\n---\ncharacters: {}\nestimated tokens: {}\nlines: {}\n",
        stats.characters, stats.estimated_tokens, stats.lines
    )
}

/// One line per scored entry, best first.
pub fn render_search(scorer: &RelevanceScorer, query: &str, limit: usize) -> String {
    let scored = scorer.score(query, limit);
    if scored.is_empty() {
        return match scorer.fallback_entry() {
            Some(entry) => format!("no matches; fallback entry `{}`\n", entry.id),
            None => "no matches\n".to_string(),
        };
    }
    let mut out = String::new();
    for (rank, s) in scored.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<24} score={} {}",
            rank + 1,
            s.entry.id,
            s.score,
            s.entry.title
        );
    }
    out
}

/// Loaded entries in store order with their keyword counts.
pub fn render_contexts(store: &KnowledgeStore) -> String {
    if store.is_empty() {
        return "no contexts loaded\n".to_string();
    }
    let mut out = String::new();
    for entry in store.entries() {
        let _ = writeln!(
            out,
            "{:<24} {:>3} keywords  {}",
            entry.id,
            entry.keywords.len(),
            entry.title
        );
    }
    out
}

pub fn render_stats(stats: &KnowledgeStats, json: bool) -> Result<String, SabiusError> {
    if json {
        return serde_json::to_string_pretty(stats)
            .map(|s| s + "\n")
            .map_err(|e| SabiusError::Internal(format!("failed to serialize stats: {e}")));
    }
    Ok(format!(
        "contexts: {}\nkeywords: {}\nestimated tokens: {}\navailable: {}\n",
        stats.total_contexts,
        stats.total_keywords,
        stats.estimated_total_tokens,
        stats.available_contexts.join(", ")
    ))
}

/// What `sabius catalog` looks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Professors {
        query: String,
        limit: usize,
    },
    Publications {
        query: String,
        unit: Option<String>,
        group: Option<String>,
        limit: usize,
    },
    Cases {
        query: String,
    },
}

pub fn render_catalog(catalog: &KnowledgeCatalog, query: &CatalogQuery) -> String {
    match query {
        CatalogQuery::Professors { query, limit } => {
            let found = catalog.search_professors(query, *limit);
            if found.is_empty() {
                return format!("no professors match `{query}`\n");
            }
            KnowledgeCatalog::format_professors(&found) + "\n"
        }
        CatalogQuery::Publications {
            query,
            unit,
            group,
            limit,
        } => {
            let found =
                catalog.search_publications(query, unit.as_deref(), group.as_deref(), *limit);
            if found.is_empty() {
                return format!("no publications match `{query}`\n");
            }
            KnowledgeCatalog::format_publications(&found) + "\n"
        }
        CatalogQuery::Cases { query } => {
            if query.trim().is_empty() {
                let cases = catalog.entrepreneurship_cases();
                if cases.is_empty() {
                    return "no entrepreneurship cases\n".to_string();
                }
                return cases.iter().map(case_heading).map(|h| h + "\n").collect();
            }
            match catalog.find_entrepreneurship_case(query) {
                Some(case) => format_case(&case),
                None => format!("no entrepreneurship case matches `{query}`\n"),
            }
        }
    }
}

fn case_heading(case: &EntrepreneurshipCase) -> String {
    match &case.empresa {
        Some(company) if !company.is_empty() => format!("{} ({company})", case.nombre),
        _ => case.nombre.clone(),
    }
}

fn format_case(case: &EntrepreneurshipCase) -> String {
    let mut out = case_heading(case) + "\n";
    for (key, value) in &case.extra {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let _ = writeln!(out, "  {key}: {value}");
    }
    out
}
