// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the Sabius assistant.
//!
//! Prompts are built from three zones:
//! - **Static zone**: operating preamble (file, inline or built-in)
//! - **Knowledge zone**: the `core` entry plus entries relevant to the query
//! - **Conditional zone**: per-turn context from registered providers,
//!   injected into the chat window by the agent
//!
//! The [`PromptAssembler`] produces the session instructions; the
//! [`ChatWindow`] bounds chat history for each completed user turn.

pub mod conditional;
pub mod knowledge;
pub mod static_zone;
pub mod window;

use std::sync::Arc;

use sabius_config::model::{AgentConfig, KnowledgeConfig};
use sabius_core::SabiusError;
use sabius_knowledge::RelevanceScorer;
use serde::Serialize;
use tracing::debug;

pub use conditional::ConditionalProvider;
pub use knowledge::KnowledgeProvider;
pub use static_zone::{DEFAULT_PREAMBLE, StaticZone};
pub use window::{ChatWindow, EXTRA_CONTEXT_PREFIX};

/// Id of the entry that is always part of the prompt.
pub const CORE_ENTRY: &str = "core";

/// Used in place of the `core` entry when the store has none.
pub const DEFAULT_BASE_INFO: &str = "## Información Base del ConvergenceLab
Ubicación: Edificio Ad Portas, Eje 17, Piso 3
Contacto: convergence.lab@unisabana.edu.co
Universidad: Universidad de La Sabana";

const SPECIFIC_CONTEXT_HEADER: &str = "\n--- CONTEXTO ESPECÍFICO PARA ESTA PREGUNTA ---\n";
const ALL_CONTEXTS_HEADER: &str = "\n--- TODOS LOS CONTEXTOS DISPONIBLES ---\n";

/// Size figures for an assembled prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptStats {
    pub characters: usize,
    /// Rough estimate at four characters per token.
    pub estimated_tokens: usize,
    /// Number of newline characters.
    pub lines: usize,
}

impl PromptStats {
    pub fn of(prompt: &str) -> Self {
        let characters = prompt.chars().count();
        Self {
            characters,
            estimated_tokens: characters / 4,
            lines: prompt.matches('\n').count(),
        }
    }
}

/// Builds session instructions and per-turn context.
///
/// Holds no mutable state; one instance is shared by every session.
pub struct PromptAssembler {
    static_zone: StaticZone,
    knowledge: KnowledgeProvider,
    conditional_providers: Vec<Box<dyn ConditionalProvider>>,
}

impl PromptAssembler {
    /// Loads the static zone from `agent` and wraps `scorer` in a
    /// knowledge provider limited to `knowledge.max_sections`.
    pub async fn new(
        agent: &AgentConfig,
        knowledge: &KnowledgeConfig,
        scorer: Arc<RelevanceScorer>,
    ) -> Result<Self, SabiusError> {
        let static_zone = StaticZone::new(agent).await?;
        Ok(Self::from_parts(
            static_zone,
            KnowledgeProvider::new(scorer, knowledge.max_sections),
        ))
    }

    pub fn from_parts(static_zone: StaticZone, knowledge: KnowledgeProvider) -> Self {
        Self {
            static_zone,
            knowledge,
            conditional_providers: Vec::new(),
        }
    }

    /// Registers an extra per-turn provider, consulted after the knowledge
    /// provider in registration order.
    pub fn add_conditional_provider(&mut self, provider: Box<dyn ConditionalProvider>) {
        self.conditional_providers.push(provider);
    }

    pub fn static_zone(&self) -> &StaticZone {
        &self.static_zone
    }

    pub fn knowledge(&self) -> &KnowledgeProvider {
        &self.knowledge
    }

    /// Full instructions for `query`; an empty query lists every entry.
    ///
    /// Parts are joined with a single newline:
    /// 1. the preamble
    /// 2. the `core` entry, or [`DEFAULT_BASE_INFO`]
    /// 3. relevant sections for the query, or a note naming the topics
    ///    available, or every entry labelled by id when there is no query
    pub fn build_prompt(&self, query: &str) -> String {
        let store = self.knowledge.scorer().store();
        let mut parts: Vec<String> = vec![self.static_zone.preamble().to_string()];

        match store.get(CORE_ENTRY) {
            Some(core) => parts.push(core.format_section()),
            None => parts.push(DEFAULT_BASE_INFO.to_string()),
        }

        if !query.is_empty() {
            let relevant = self.relevant_context(query);
            if relevant.is_empty() {
                let available: Vec<&str> = store.ids().collect();
                parts.push(format!(
                    "\n⚠️ Contexto relevante no encontrado. Temas disponibles: {}",
                    available.join(", ")
                ));
            } else {
                parts.push(SPECIFIC_CONTEXT_HEADER.to_string());
                parts.push(relevant);
            }
        } else if !store.is_empty() {
            parts.push(ALL_CONTEXTS_HEADER.to_string());
            parts.extend(store.entries().iter().map(|e| e.format_labeled()));
        }

        let prompt = parts.join("\n");
        let stats = PromptStats::of(&prompt);
        debug!(
            query_chars = query.len(),
            characters = stats.characters,
            estimated_tokens = stats.estimated_tokens,
            "assembled prompt"
        );
        prompt
    }

    /// Relevant sections for `query` joined by blank lines.
    pub fn relevant_context(&self, query: &str) -> String {
        self.knowledge.relevant_context(query)
    }

    /// Context gathered from every provider for one user turn, or `None`
    /// when no provider contributed.
    pub async fn turn_context(&self, query: &str) -> Result<Option<String>, SabiusError> {
        let mut parts = Vec::new();
        if let Some(ctx) = self.knowledge.provide_context(query).await? {
            parts.push(ctx);
        }
        for provider in &self.conditional_providers {
            if let Some(ctx) = provider.provide_context(query).await? {
                parts.push(ctx);
            }
        }
        Ok((!parts.is_empty()).then(|| parts.join("\n\n")))
    }
}
