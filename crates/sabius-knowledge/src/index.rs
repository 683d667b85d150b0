// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword index: lowercase keyword to the entries that carry it.

use std::collections::BTreeMap;

use crate::store::KnowledgeStore;

/// Read-only map from keyword to entry positions in the store.
///
/// Built from a [`KnowledgeStore`], so every position it holds refers to an
/// existing entry. Positions per keyword are ascending and distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keywords: BTreeMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn build(store: &KnowledgeStore) -> Self {
        let mut keywords: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, entry) in store.entries().iter().enumerate() {
            for keyword in &entry.keywords {
                keywords.entry(keyword.clone()).or_default().push(position);
            }
        }
        tracing::debug!(keywords = keywords.len(), "keyword index built");
        Self { keywords }
    }

    /// Entry positions for a keyword (matched case-insensitively).
    pub fn lookup(&self, keyword: &str) -> &[usize] {
        self.keywords
            .get(keyword.trim().to_lowercase().as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Keywords with their entry positions, in keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.keys().map(String::as_str)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
