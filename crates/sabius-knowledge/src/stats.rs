// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary statistics over the loaded knowledge.

use serde::Serialize;

use crate::index::KeywordIndex;
use crate::store::KnowledgeStore;

/// Rough characters-per-token ratio used for size estimates.
pub const CHARS_PER_TOKEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeStats {
    pub total_contexts: usize,
    pub total_keywords: usize,
    pub estimated_total_tokens: usize,
    pub available_contexts: Vec<String>,
}

impl KnowledgeStats {
    pub fn collect(store: &KnowledgeStore, index: &KeywordIndex) -> Self {
        let total_chars: usize = store
            .entries()
            .iter()
            .map(|entry| {
                serde_json::to_string(entry)
                    .map(|json| json.chars().count())
                    .unwrap_or(0)
            })
            .sum();

        Self {
            total_contexts: store.len(),
            total_keywords: index.len(),
            estimated_total_tokens: total_chars / CHARS_PER_TOKEN,
            available_contexts: store.ids().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnowledgeEntry;

    #[test]
    fn counts_entries_and_distinct_keywords() {
        let store: KnowledgeStore = [
            KnowledgeEntry::new("core", "Core", ["lab", "convergence"], "x".repeat(400)),
            KnowledgeEntry::new("faculty", "Faculty", ["lab", "profesor"], ""),
        ]
        .into_iter()
        .collect();
        let stats = KnowledgeStats::collect(&store, &KeywordIndex::build(&store));
        assert_eq!(stats.total_contexts, 2);
        assert_eq!(stats.total_keywords, 3);
        assert_eq!(stats.available_contexts, vec!["core", "faculty"]);
        assert!(stats.estimated_total_tokens >= 100);
    }

    #[test]
    fn empty_store_has_zero_stats() {
        let store = KnowledgeStore::empty();
        let stats = KnowledgeStats::collect(&store, &KeywordIndex::build(&store));
        assert_eq!(stats.total_contexts, 0);
        assert_eq!(stats.estimated_total_tokens, 0);
    }
}
