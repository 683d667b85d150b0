// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conditional zone: per-turn context chosen from the user's query.

use async_trait::async_trait;
use sabius_core::SabiusError;

/// A source of context that depends on what the user just asked.
///
/// The assembler calls every registered provider after each user turn and
/// joins their output into the supplementary context for that turn.
#[async_trait]
pub trait ConditionalProvider: Send + Sync {
    /// Context for `query`, or `None` when the provider has nothing to add.
    async fn provide_context(&self, query: &str) -> Result<Option<String>, SabiusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Option<&'static str>);

    #[async_trait]
    impl ConditionalProvider for FixedProvider {
        async fn provide_context(&self, _query: &str) -> Result<Option<String>, SabiusError> {
            Ok(self.0.map(str::to_string))
        }
    }

    #[tokio::test]
    async fn provider_returns_context() {
        let provider = FixedProvider(Some("## Horarios\n\nLunes a viernes"));
        let ctx = provider.provide_context("horarios").await.unwrap();
        assert_eq!(ctx.as_deref(), Some("## Horarios\n\nLunes a viernes"));
    }

    #[tokio::test]
    async fn provider_is_object_safe() {
        let providers: Vec<Box<dyn ConditionalProvider>> =
            vec![Box::new(FixedProvider(None)), Box::new(FixedProvider(Some("x")))];
        let mut found = Vec::new();
        for p in &providers {
            found.push(p.provide_context("q").await.unwrap());
        }
        assert_eq!(found, vec![None, Some("x".to_string())]);
    }
}
