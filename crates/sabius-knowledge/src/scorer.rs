// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-overlap relevance scoring.
//!
//! An entry's score for a query is the number of its distinct keywords that
//! occur as substrings of the lowercased query. Results are ordered by score,
//! highest first, with ties kept in store order.

use std::sync::Arc;

use crate::index::KeywordIndex;
use crate::store::KnowledgeStore;
use crate::types::{KnowledgeEntry, ScoredEntry};

/// Ranks store entries against free-text queries.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    store: Arc<KnowledgeStore>,
    index: KeywordIndex,
    fallback: Option<String>,
}

impl RelevanceScorer {
    /// Build the keyword index for `store`. No fallback is configured.
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        let index = KeywordIndex::build(&store);
        Self {
            store,
            index,
            fallback: None,
        }
    }

    /// Entry returned by [`select`](Self::select) when nothing matches.
    pub fn with_fallback(mut self, entry_id: impl Into<String>) -> Self {
        self.fallback = Some(entry_id.into());
        self
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn index(&self) -> &KeywordIndex {
        &self.index
    }

    /// The configured fallback entry, if it exists in the store.
    pub fn fallback_entry(&self) -> Option<&KnowledgeEntry> {
        self.fallback.as_deref().and_then(|id| self.store.get(id))
    }

    /// Up to `max` entries sharing at least one keyword with `query`.
    pub fn score(&self, query: &str, max: usize) -> Vec<ScoredEntry<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || max == 0 {
            return Vec::new();
        }

        let mut scores = vec![0usize; self.store.len()];
        for (keyword, positions) in self.index.iter() {
            if query.contains(keyword) {
                for &position in positions {
                    scores[position] += 1;
                }
            }
        }

        let mut ranked: Vec<ScoredEntry<'_>> = scores
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score > 0)
            .filter_map(|(position, score)| {
                self.store
                    .at(position)
                    .map(|entry| ScoredEntry { entry, score })
            })
            .collect();
        // Stable sort keeps store order among equal scores.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(max);

        tracing::debug!(
            matched = ranked.len(),
            top = ranked.first().map(|s| s.entry.id.as_str()).unwrap_or(""),
            "scored query"
        );
        ranked
    }

    /// Like [`score`](Self::score), but falls back to the configured entry
    /// when nothing matches.
    pub fn select(&self, query: &str, max: usize) -> Vec<&KnowledgeEntry> {
        let selected: Vec<&KnowledgeEntry> =
            self.score(query, max).into_iter().map(|s| s.entry).collect();
        if !selected.is_empty() || max == 0 {
            return selected;
        }
        self.fallback_entry().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RelevanceScorer {
        let store: KnowledgeStore = [
            KnowledgeEntry::new("core", "Core", ["convergence", "lab"], "core"),
            KnowledgeEntry::new("faculty", "Faculty", ["profesor", "investigador"], "f"),
            KnowledgeEntry::new("research", "Research", ["investigador", "revista", "grupo"], "r"),
            KnowledgeEntry::new("events", "Events", ["evento"], "e"),
        ]
        .into_iter()
        .collect();
        RelevanceScorer::new(Arc::new(store)).with_fallback("core")
    }

    fn ids<'a>(scored: &[ScoredEntry<'a>]) -> Vec<&'a str> {
        scored.iter().map(|s| s.entry.id.as_str()).collect()
    }

    #[test]
    fn higher_score_ranks_first() {
        let scorer = scorer();
        let scored = scorer.score("¿Qué investigador publicó en la revista del grupo?", 3);
        assert_eq!(ids(&scored), vec!["research", "faculty"]);
        assert_eq!(scored[0].score, 3);
        assert_eq!(scored[1].score, 1);
    }

    #[test]
    fn ties_keep_store_order() {
        let scorer = scorer();
        let scored = scorer.score("un evento con un profesor", 3);
        assert_eq!(ids(&scored), vec!["faculty", "events"]);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let scorer = scorer();
        assert_eq!(ids(&scorer.score("PROFESORES", 3)), vec!["faculty"]);
        assert_eq!(ids(&scorer.score("eventos", 3)), vec!["events"]);
    }

    #[test]
    fn result_never_exceeds_max() {
        let scorer = scorer();
        let query = "lab profesor revista evento";
        assert_eq!(scorer.score(query, 2).len(), 2);
        assert!(scorer.score(query, 0).is_empty());
    }

    #[test]
    fn keyword_counted_once_per_entry() {
        let scorer = scorer();
        let scored = scorer.score("revista revista revista", 3);
        assert_eq!(scored[0].score, 1);
    }

    #[test]
    fn empty_query_scores_nothing() {
        let scorer = scorer();
        assert!(scorer.score("", 3).is_empty());
        assert!(scorer.score("   ", 3).is_empty());
    }

    #[test]
    fn select_falls_back_when_nothing_matches() {
        let scorer = scorer();
        let selected = scorer.select("el clima de hoy", 3);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "core");
    }

    #[test]
    fn select_without_fallback_is_empty() {
        let store = Arc::new(KnowledgeStore::from_iter([KnowledgeEntry::new(
            "a",
            "A",
            ["x"],
            "",
        )]));
        let scorer = RelevanceScorer::new(store);
        assert!(scorer.select("nothing", 3).is_empty());
    }

    #[test]
    fn missing_fallback_entry_is_ignored() {
        let store = Arc::new(KnowledgeStore::empty());
        let scorer = RelevanceScorer::new(store).with_fallback("core");
        assert!(scorer.select("anything", 3).is_empty());
    }
}
