// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat window: bounds the model's chat history after each user turn and
//! appends the supplementary context for that turn.

use sabius_config::model::SessionConfig;
use sabius_core::ChatItem;

/// Prefix of the system item carrying per-turn context.
pub const EXTRA_CONTEXT_PREFIX: &str = "[CONTEXTO ADICIONAL RELEVANTE]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatWindow {
    max_items: usize,
    extra_context_chars: usize,
    min_extra_context_chars: usize,
}

impl ChatWindow {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            max_items: config.max_chat_items,
            extra_context_chars: config.extra_context_chars,
            min_extra_context_chars: config.min_extra_context_chars,
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Keep only the most recent `max_items` entries.
    pub fn trim(&self, mut items: Vec<ChatItem>) -> Vec<ChatItem> {
        if items.len() > self.max_items {
            items.drain(..items.len() - self.max_items);
        }
        items
    }

    /// System item for `context`, or `None` when it is too short to matter.
    ///
    /// Only the last `extra_context_chars` characters are kept.
    pub fn context_item(&self, context: &str) -> Option<ChatItem> {
        if context.chars().count() <= self.min_extra_context_chars {
            return None;
        }
        Some(ChatItem::system(format!(
            "{EXTRA_CONTEXT_PREFIX}{}",
            tail_chars(context, self.extra_context_chars)
        )))
    }

    /// Trim `items`, then append the context item if there is one.
    pub fn apply(&self, items: Vec<ChatItem>, context: Option<&str>) -> Vec<ChatItem> {
        let mut items = self.trim(items);
        if let Some(item) = context.and_then(|c| self.context_item(c)) {
            items.push(item);
        }
        items
    }
}

impl Default for ChatWindow {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

/// The last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    match s.char_indices().nth(total - n) {
        Some((offset, _)) => &s[offset..],
        None => "",
    }
}
