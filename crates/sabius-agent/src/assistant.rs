// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant persona: session instructions and per-turn chat context.

use std::sync::Arc;

use async_trait::async_trait;
use sabius_config::SabiusConfig;
use sabius_context::{ChatWindow, PromptAssembler};
use sabius_core::{ChatItem, SabiusError, TurnHandler};
use sabius_knowledge::RelevanceScorer;
use tracing::debug;

/// Supplies instructions to the voice session and rewrites the chat
/// context after every user turn.
pub struct Assistant {
    assembler: Arc<PromptAssembler>,
    window: ChatWindow,
}

impl Assistant {
    pub fn new(assembler: Arc<PromptAssembler>, window: ChatWindow) -> Self {
        Self { assembler, window }
    }

    /// Builds the prompt assembler and chat window described by `config`.
    pub async fn from_config(
        config: &SabiusConfig,
        scorer: Arc<RelevanceScorer>,
    ) -> Result<Self, SabiusError> {
        let assembler = PromptAssembler::new(&config.agent, &config.knowledge, scorer).await?;
        Ok(Self::new(
            Arc::new(assembler),
            ChatWindow::new(&config.session),
        ))
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.assembler
    }

    pub fn window(&self) -> &ChatWindow {
        &self.window
    }

    /// Session-wide instructions: preamble, core entry and every entry.
    pub fn instructions(&self) -> String {
        self.assembler.build_prompt("")
    }

    /// Instructions focused on one query.
    pub fn instructions_for(&self, query: &str) -> String {
        self.assembler.build_prompt(query)
    }
}

#[async_trait]
impl TurnHandler for Assistant {
    async fn on_user_turn_completed(
        &self,
        chat: Vec<ChatItem>,
        message: &ChatItem,
    ) -> Vec<ChatItem> {
        let query = message.text.trim();
        let context = if query.is_empty() {
            None
        } else {
            match self.assembler.turn_context(query).await {
                Ok(ctx) => ctx,
                Err(e) => {
                    debug!(error = %e, "failed to gather context for user turn");
                    None
                }
            }
        };

        let before = chat.len().min(self.window.max_items());
        let items = self.window.apply(chat, context.as_deref());
        if items.len() > before {
            debug!(items = items.len(), "additional context added for this turn");
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use sabius_config::model::SessionConfig;
    use sabius_context::{EXTRA_CONTEXT_PREFIX, KnowledgeProvider, StaticZone};
    use sabius_core::ChatRole;
    use sabius_knowledge::{KnowledgeEntry, KnowledgeStore};

    use super::*;

    fn assistant(max_chat_items: usize) -> Assistant {
        let long = "El Convergence Lab ofrece prototipado, mentorías y acompañamiento a proyectos de innovación abierta.";
        let store: KnowledgeStore = [
            KnowledgeEntry::new("core", "Convergence Lab", ["lab"], "Espacio de innovación."),
            KnowledgeEntry::new("servicios", "Servicios", ["servicio"], long),
        ]
        .into_iter()
        .collect();
        let scorer = Arc::new(RelevanceScorer::new(Arc::new(store)));
        let assembler = PromptAssembler::from_parts(
            StaticZone::from_text("PREAMBULO"),
            KnowledgeProvider::new(scorer, 3),
        );
        let window = ChatWindow::new(&SessionConfig {
            max_chat_items,
            extra_context_chars: 2000,
            min_extra_context_chars: 100,
        });
        Assistant::new(Arc::new(assembler), window)
    }

    fn history(n: usize) -> Vec<ChatItem> {
        (0..n).map(|i| ChatItem::assistant(format!("respuesta {i}"))).collect()
    }

    #[test]
    fn instructions_list_every_entry() {
        let text = assistant(15).instructions();
        assert!(text.starts_with("PREAMBULO\n## Convergence Lab"));
        assert!(text.contains("### [SERVICIOS]"));
    }

    #[test]
    fn instructions_for_query_are_focused() {
        let text = assistant(15).instructions_for("¿Qué servicios tienen?");
        assert!(text.contains("--- CONTEXTO ESPECÍFICO PARA ESTA PREGUNTA ---"));
        assert!(!text.contains("### [SERVICIOS]"));
    }

    #[tokio::test]
    async fn relevant_turn_gets_context_item() {
        let a = assistant(15);
        let items = a
            .on_user_turn_completed(history(3), &ChatItem::user("¿Qué servicios ofrecen?"))
            .await;
        assert_eq!(items.len(), 4);
        let last = items.last().unwrap();
        assert_eq!(last.role, ChatRole::System);
        assert!(last.text.starts_with(EXTRA_CONTEXT_PREFIX));
        assert!(last.text.contains("prototipado"));
    }

    #[tokio::test]
    async fn short_context_is_skipped() {
        let a = assistant(15);
        let items = a
            .on_user_turn_completed(history(3), &ChatItem::user("¿Dónde queda el lab?"))
            .await;
        assert_eq!(items, history(3));
    }

    #[tokio::test]
    async fn history_is_trimmed_before_context() {
        let a = assistant(5);
        let items = a
            .on_user_turn_completed(history(20), &ChatItem::user("servicios"))
            .await;
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].text, "respuesta 15");
    }

    #[tokio::test]
    async fn blank_turn_only_trims() {
        let a = assistant(2);
        let items = a.on_user_turn_completed(history(4), &ChatItem::user("  ")).await;
        assert_eq!(items, history(4)[2..].to_vec());
    }
}
