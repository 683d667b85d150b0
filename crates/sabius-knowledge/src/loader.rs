// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Start-up loading of knowledge entries from JSON files.
//!
//! Missing directories and files are not errors: they contribute no
//! entries. Files that exist but cannot be read or parsed are logged and
//! skipped, so one bad file never empties the whole store.

use std::path::Path;

use sabius_core::SabiusError;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::format::{format_faculty, format_research};
use crate::store::{KnowledgeStore, KnowledgeStoreBuilder};
use crate::types::KnowledgeEntry;

pub const FACULTY_FILE: &str = "faculty_professors.json";
pub const RESEARCH_FILE: &str = "research_publications.json";

pub const FACULTY_ENTRY: &str = "faculty_professors";
pub const RESEARCH_ENTRY: &str = "research_publications";

const FACULTY_KEYWORDS: &[&str] = &[
    "profesor",
    "faculty",
    "docente",
    "académico",
    "investigador",
    "enfermería",
    "enfermeria",
    "enfermero",
    "enfermera",
    "catedra",
    "cátedra",
    "magister",
    "maestría",
    "doctorado",
    "doctor",
    "maestro",
    "teacher",
    "instructor",
];

const RESEARCH_KEYWORDS: &[&str] = &[
    "publicación",
    "research",
    "investigación",
    "artículo",
    "estudio",
    "investigador",
    "revista",
    "paper",
    "tesis",
    "grupo",
    "unidad",
    "producto",
    "producción",
    "científico",
    "cientifico",
    "journal",
    "publicado",
    "publicada",
];

impl KnowledgeStore {
    /// Load every context file in `context_dir` followed by the faculty and
    /// research entries from `knowledge_base_dir`.
    pub fn load(context_dir: &Path, knowledge_base_dir: &Path) -> KnowledgeStore {
        let mut builder = KnowledgeStore::builder();
        load_context_dir(&mut builder, context_dir);
        load_knowledge_base(&mut builder, knowledge_base_dir);
        info!(entries = builder.len(), "knowledge store loaded");
        builder.build()
    }
}

/// Add one entry per `*.json` file in `dir`, in file-name order.
pub fn load_context_dir(builder: &mut KnowledgeStoreBuilder, dir: &Path) {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "context directory not found");
            return;
        }
    };

    let mut files: Vec<_> = read_dir
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for path in files {
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match read_json(&path).and_then(|data| context_entry(id, data, &path)) {
            Ok(entry) => {
                info!(entry = %entry.id, keywords = entry.keywords.len(), "context loaded");
                builder.insert(entry);
            }
            Err(e) => error!(path = %path.display(), error = %e, "skipping context file"),
        }
    }
}

/// Add the faculty and research entries when their files exist.
pub fn load_knowledge_base(builder: &mut KnowledgeStoreBuilder, dir: &Path) {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "knowledge base directory not found");
        return;
    }

    let sources: [(&str, &str, &str, &[&str], fn(&Value) -> String); 2] = [
        (
            FACULTY_FILE,
            FACULTY_ENTRY,
            "Profesores y Facultad",
            FACULTY_KEYWORDS,
            format_faculty,
        ),
        (
            RESEARCH_FILE,
            RESEARCH_ENTRY,
            "Publicaciones e Investigación",
            RESEARCH_KEYWORDS,
            format_research,
        ),
    ];

    for (file, id, title, keywords, render) in sources {
        let path = dir.join(file);
        if !path.is_file() {
            continue;
        }
        match read_json(&path) {
            Ok(data) => {
                builder.insert(KnowledgeEntry::new(id, title, keywords, render(&data)));
                info!(entry = id, "knowledge base entry loaded");
            }
            Err(e) => error!(path = %path.display(), error = %e, "skipping knowledge base file"),
        }
    }
}

pub(crate) fn read_json(path: &Path) -> Result<Value, SabiusError> {
    let knowledge_error = |source: Box<dyn std::error::Error + Send + Sync>| {
        SabiusError::Knowledge {
            path: path.display().to_string(),
            source,
        }
    };
    let text = std::fs::read_to_string(path).map_err(|e| knowledge_error(Box::new(e)))?;
    serde_json::from_str(&text).map_err(|e| knowledge_error(Box::new(e)))
}

/// Build an entry from a context file: `title`, `keywords` and `content`
/// are read from the top-level object.
fn context_entry(id: &str, data: Value, path: &Path) -> Result<KnowledgeEntry, SabiusError> {
    let Value::Object(mut doc) = data else {
        return Err(SabiusError::Knowledge {
            path: path.display().to_string(),
            source: "expected a JSON object".into(),
        });
    };

    let title = match doc.remove("title") {
        Some(Value::String(title)) => title,
        _ => id.to_uppercase(),
    };
    let keywords: Vec<String> = match doc.remove("keywords") {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    let content = match doc.remove("content") {
        Some(Value::String(content)) => content,
        Some(Value::Null) | None => String::new(),
        Some(other) => serde_json::to_string_pretty(&other).unwrap_or_default(),
    };

    Ok(KnowledgeEntry::new(id, title, keywords, content))
}
