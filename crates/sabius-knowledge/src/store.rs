// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable, insertion-ordered knowledge store.

use std::collections::HashMap;

use crate::types::KnowledgeEntry;

/// All knowledge entries, in the order they were loaded.
///
/// Built once at start-up through [`KnowledgeStoreBuilder`] and read-only
/// afterwards, so it can be shared across turns behind an `Arc` without
/// locking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    by_id: HashMap<String, usize>,
}

impl KnowledgeStore {
    pub fn builder() -> KnowledgeStoreBuilder {
        KnowledgeStoreBuilder::default()
    }

    /// An empty store, used when no data files are available.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.by_id.get(id).map(|&pos| &self.entries[pos])
    }

    /// Entry at a load position.
    pub fn at(&self, position: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries before freezing them into a [`KnowledgeStore`].
#[derive(Debug, Default)]
pub struct KnowledgeStoreBuilder {
    store: KnowledgeStore,
}

impl KnowledgeStoreBuilder {
    /// Adds an entry. Re-inserting an id replaces the entry in place,
    /// keeping its original position.
    pub fn insert(&mut self, entry: KnowledgeEntry) -> &mut Self {
        match self.store.by_id.get(&entry.id) {
            Some(&pos) => {
                tracing::debug!(entry = %entry.id, "replacing knowledge entry");
                self.store.entries[pos] = entry;
            }
            None => {
                self.store
                    .by_id
                    .insert(entry.id.clone(), self.store.entries.len());
                self.store.entries.push(entry);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn build(self) -> KnowledgeStore {
        self.store
    }
}

impl FromIterator<KnowledgeEntry> for KnowledgeStore {
    fn from_iter<T: IntoIterator<Item = KnowledgeEntry>>(iter: T) -> Self {
        let mut builder = KnowledgeStore::builder();
        for entry in iter {
            builder.insert(entry);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, content: &str) -> KnowledgeEntry {
        KnowledgeEntry::new(id, id.to_uppercase(), [id], content)
    }

    #[test]
    fn preserves_insertion_order() {
        let store: KnowledgeStore = [entry("core", "a"), entry("lab", "b"), entry("eventos", "c")]
            .into_iter()
            .collect();
        let ids: Vec<&str> = store.ids().collect();
        assert_eq!(ids, vec!["core", "lab", "eventos"]);
        assert_eq!(store.at(1).map(|e| e.id.as_str()), Some("lab"));
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut builder = KnowledgeStore::builder();
        builder
            .insert(entry("core", "old"))
            .insert(entry("lab", "b"))
            .insert(entry("core", "new"));
        let store = builder.build();
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].content, "new");
        assert_eq!(store.get("core").map(|e| e.content.as_str()), Some("new"));
    }

    #[test]
    fn empty_store_has_nothing() {
        let store = KnowledgeStore::empty();
        assert!(store.is_empty());
        assert!(store.get("core").is_none());
    }
}
