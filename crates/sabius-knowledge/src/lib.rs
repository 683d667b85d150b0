// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge layer for the Sabius assistant.
//!
//! Institutional data (context files, faculty and research listings) is
//! loaded once at start-up into an immutable [`KnowledgeStore`], indexed by
//! keyword, and ranked per query by the [`RelevanceScorer`].
//!
//! ## Architecture
//!
//! - **KnowledgeStore**: insertion-ordered entries, shared behind `Arc`
//! - **KeywordIndex**: lowercase keyword to entry positions
//! - **RelevanceScorer**: keyword-overlap ranking with an optional fallback
//! - **KnowledgeCatalog**: targeted lookups over the knowledge-base files
//! - **KnowledgeStats**: counts and size estimates

pub mod catalog;
pub mod format;
pub mod index;
pub mod loader;
pub mod scorer;
pub mod stats;
pub mod store;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use sabius_config::model::KnowledgeConfig;

pub use catalog::{EntrepreneurshipCase, KnowledgeCatalog};
pub use index::KeywordIndex;
pub use scorer::RelevanceScorer;
pub use stats::KnowledgeStats;
pub use store::{KnowledgeStore, KnowledgeStoreBuilder};
pub use types::{KnowledgeEntry, Professor, Publication, ScoredEntry};

/// Load the store described by `config` and build its scorer.
pub fn load_scorer(config: &KnowledgeConfig) -> RelevanceScorer {
    let store = KnowledgeStore::load(
        Path::new(&config.context_dir),
        Path::new(&config.knowledge_base_dir),
    );
    let scorer = RelevanceScorer::new(Arc::new(store));
    match config.fallback() {
        Some(id) => scorer.with_fallback(id),
        None => scorer,
    }
}
