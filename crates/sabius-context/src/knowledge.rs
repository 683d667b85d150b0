// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conditional provider backed by the relevance scorer.

use std::sync::Arc;

use async_trait::async_trait;
use sabius_core::SabiusError;
use sabius_knowledge::RelevanceScorer;
use tracing::debug;

use crate::conditional::ConditionalProvider;

/// Injects the knowledge entries that best match the user's query.
#[derive(Debug, Clone)]
pub struct KnowledgeProvider {
    scorer: Arc<RelevanceScorer>,
    max_sections: usize,
}

impl KnowledgeProvider {
    pub fn new(scorer: Arc<RelevanceScorer>, max_sections: usize) -> Self {
        Self {
            scorer,
            max_sections,
        }
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    pub fn max_sections(&self) -> usize {
        self.max_sections
    }

    /// The selected entries as `## Title` sections separated by blank lines.
    ///
    /// Falls back to the scorer's fallback entry when nothing matches; an
    /// empty string means neither a match nor a fallback exists.
    pub fn relevant_context(&self, query: &str) -> String {
        let sections: Vec<String> = self
            .scorer
            .select(query, self.max_sections)
            .into_iter()
            .map(|entry| entry.format_section())
            .collect();
        sections.join("\n\n")
    }
}

#[async_trait]
impl ConditionalProvider for KnowledgeProvider {
    async fn provide_context(&self, query: &str) -> Result<Option<String>, SabiusError> {
        let context = self.relevant_context(query);
        if context.is_empty() {
            return Ok(None);
        }
        debug!(chars = context.len(), "knowledge context selected");
        Ok(Some(context))
    }
}
