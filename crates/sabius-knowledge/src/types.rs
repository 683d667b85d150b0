// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge domain types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One indexed unit of institutional text.
///
/// Keywords are normalized on construction (trimmed, lowercased, empty
/// ones dropped) so the index and the scorer agree on their spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub keywords: BTreeSet<String>,
    pub content: String,
}

impl KnowledgeEntry {
    pub fn new<I, S>(
        id: impl Into<String>,
        title: impl Into<String>,
        keywords: I,
        content: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.into(),
            title: title.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            content: content.into(),
        }
    }

    /// `## {title}` heading followed by the content, as injected per turn.
    pub fn format_section(&self) -> String {
        format!("## {}\n\n{}", self.title, self.content)
    }

    /// `### [ID]` labelled block, used when every entry is listed.
    pub fn format_labeled(&self) -> String {
        format!(
            "\n### [{}]\n{}\n\n{}",
            self.id.to_uppercase(),
            self.title,
            self.content
        )
    }
}

/// An entry with its relevance score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a KnowledgeEntry,
    /// Number of distinct entry keywords found in the query.
    pub score: usize,
}

/// A faculty member record from `faculty_professors.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub titulo: Option<String>,
    #[serde(default, alias = "department", deserialize_with = "lenient_string")]
    pub categoria_institucional: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub categoria_minciencias: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pais: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pregrado: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grupo_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A research publication record from `research_publications.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub titulo: Option<String>,
    #[serde(default, alias = "journal", deserialize_with = "lenient_string")]
    pub revista: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grupo: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Parse a list of loosely typed records, skipping entries that are not objects.
pub(crate) fn records<T: for<'de> Deserialize<'de>>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

/// Render a scalar JSON value the way it reads in prose.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accept strings, numbers and booleans as text; `null` becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(display_value(&other)),
    })
}
