// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured queries over the knowledge-base directory.
//!
//! Where the [`RelevanceScorer`](crate::RelevanceScorer) picks whole entries
//! for a prompt, the catalog answers targeted lookups: professors by name,
//! publications by unit or group, entrepreneurship cases and the
//! institutional figures.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::loader::{FACULTY_FILE, RESEARCH_FILE, read_json};
use crate::types::{Professor, Publication, display_value, records};

pub const INSTITUTIONAL_FILE: &str = "institutional_context.json";
const STATS_FILE: &str = "knowledge_base_stats.json";

/// Publications listed by [`KnowledgeCatalog::format_publications`].
const MAX_FORMATTED_PUBLICATIONS: usize = 10;

/// An entrepreneurship success case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurshipCase {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub empresa: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Publications grouped by a key, in file order.
pub type PublicationGroups = Vec<(String, Vec<Publication>)>;

/// In-memory view of the knowledge-base directory.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeCatalog {
    institutional: Map<String, Value>,
    professors: Vec<Professor>,
    by_unit: PublicationGroups,
    by_group: PublicationGroups,
    stats: Option<Value>,
}

impl KnowledgeCatalog {
    /// Load every catalog file from `dir`. Missing or unreadable files
    /// leave their part of the catalog empty.
    pub fn load(dir: &Path) -> Self {
        let institutional = match load_optional(dir, INSTITUTIONAL_FILE) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let professors = match load_optional(dir, FACULTY_FILE) {
            Some(Value::Object(doc)) => doc
                .get("professors")
                .and_then(Value::as_array)
                .map(|list| records(list))
                .unwrap_or_default(),
            Some(Value::Array(list)) => records(&list),
            _ => Vec::new(),
        };

        let (by_unit, by_group) = match load_optional(dir, RESEARCH_FILE) {
            Some(Value::Object(doc)) => (
                publication_groups(doc.get("by_unit")),
                publication_groups(doc.get("by_group")),
            ),
            _ => (Vec::new(), Vec::new()),
        };

        let catalog = Self {
            institutional,
            professors,
            by_unit,
            by_group,
            stats: load_optional(dir, STATS_FILE),
        };
        debug!(
            professors = catalog.professors.len(),
            units = catalog.by_unit.len(),
            groups = catalog.by_group.len(),
            "knowledge catalog loaded"
        );
        catalog
    }

    pub fn professors(&self) -> &[Professor] {
        &self.professors
    }

    /// Compact institutional summary for the opening prompt.
    pub fn institutional_summary(&self) -> String {
        if self.institutional.is_empty() {
            return "## Universidad de La Sabana\n*Contexto institucional no disponible*".to_string();
        }

        let figures = self.university().get("cifras_2024").unwrap_or(&Value::Null);
        let figure = |path: &[&str]| {
            path.iter()
                .try_fold(figures, |v, key| v.get(key))
                .map(display_value)
                .unwrap_or_else(|| "N/A".to_string())
        };

        format!(
            "## 🎓 Universidad de La Sabana - Contexto Institucional\n\
             \n\
             ### Modelo U3G\n\
             Universidad de Tercera Generación que integra docencia, investigación e impacto social real.\n\
             \n\
             ### Cifras 2024\n\
             - **{} estudiantes** ({} pregrado, {} posgrado)\n\
             - **{} profesores**\n\
             - **{} graduados**\n\
             \n\
             ### Centros Estratégicos\n\
             - **UCTS**: Centro de Ciencia Traslacional\n\
             - **Unisabana HUB**: 127 proyectos, 17.462 personas impactadas\n\
             - **GovLab**: IA para gobierno y analítica aplicada\n\
             \n\
             ### Reconocimientos\n\
             - Acreditación Alta Calidad por 10 años\n\
             - 4ª universidad privada del país (QS Ranking)\n\
             - Top 5 nacional en Saber Pro\n\
             \n\
             **NOTA:** Tienes acceso a base de conocimiento completa sobre profesores, grupos de investigación y publicaciones. Consulta cuando el usuario pregunte sobre investigación específica.",
            figure(&["estudiantes", "total"]),
            figure(&["estudiantes", "pregrado"]),
            figure(&["estudiantes", "posgrado"]),
            figure(&["profesores", "total"]),
            figure(&["graduados"]),
        )
    }

    /// Professors whose name, title or group URL contains `query`.
    pub fn search_professors(&self, query: &str, limit: usize) -> Vec<&Professor> {
        let query = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&query))
        };
        self.professors
            .iter()
            .filter(|p| contains(&p.nombre) || contains(&p.titulo) || contains(&p.grupo_url))
            .take(limit)
            .collect()
    }

    /// Publications whose title or group contains `query`.
    ///
    /// `unit` restricts the search to one unit; otherwise `group` restricts
    /// it to one group; with neither, every unit is searched.
    pub fn search_publications(
        &self,
        query: &str,
        unit: Option<&str>,
        group: Option<&str>,
        limit: usize,
    ) -> Vec<&Publication> {
        let pool: Vec<&Publication> = match (unit, group) {
            (Some(unit), _) => self.publications_by_unit(unit).iter().collect(),
            (None, Some(group)) => self.publications_by_group(group).iter().collect(),
            (None, None) => self.by_unit.iter().flat_map(|(_, pubs)| pubs).collect(),
        };

        let query = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&query))
        };
        pool.into_iter()
            .filter(|p| contains(&p.titulo) || contains(&p.grupo))
            .take(limit)
            .collect()
    }

    pub fn publications_by_unit(&self, unit: &str) -> &[Publication] {
        find_group(&self.by_unit, unit)
    }

    pub fn publications_by_group(&self, group: &str) -> &[Publication] {
        find_group(&self.by_group, group)
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.by_unit.iter().map(|(name, _)| name.as_str())
    }

    /// Research focus areas of the university.
    pub fn research_areas(&self) -> Vec<String> {
        self.university()
            .get("investigacion_innovacion")
            .and_then(|v| v.get("focos"))
            .and_then(Value::as_array)
            .map(|list| list.iter().map(display_value).collect())
            .unwrap_or_default()
    }

    /// Professors working on artificial intelligence.
    pub fn ai_professors(&self) -> Vec<Value> {
        self.university_list("profesores_ia")
    }

    /// Research groups working on artificial intelligence.
    pub fn ai_research_groups(&self) -> Vec<Value> {
        self.university_list("grupos_investigacion_ia")
    }

    pub fn strategic_centers(&self) -> Map<String, Value> {
        self.university()
            .get("centros_estrategicos")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn entrepreneurship_cases(&self) -> Vec<EntrepreneurshipCase> {
        self.institutional
            .get("centro_emprendimiento")
            .and_then(|v| v.get("casos_exito"))
            .and_then(Value::as_array)
            .map(|list| records(list))
            .unwrap_or_default()
    }

    /// First entrepreneurship case whose name contains `name`.
    pub fn find_entrepreneurship_case(&self, name: &str) -> Option<EntrepreneurshipCase> {
        let name = name.to_lowercase();
        self.entrepreneurship_cases()
            .into_iter()
            .find(|case| case.nombre.to_lowercase().contains(&name))
    }

    /// Statistics from `knowledge_base_stats.json`, or counts computed from
    /// the loaded data when that file is absent.
    pub fn statistics(&self) -> Value {
        if let Some(stats) = &self.stats {
            return stats.clone();
        }
        let publications: usize = self.by_unit.iter().map(|(_, pubs)| pubs.len()).sum();
        json!({
            "professors": {"total": self.professors.len()},
            "publications": {"total": publications},
        })
    }

    /// Markdown block listing professors, empty when there are none.
    pub fn format_professors(professors: &[&Professor]) -> String {
        if professors.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n### Profesores Relevantes:\n\n");
        for prof in professors {
            let _ = writeln!(out, "- **{}**", prof.nombre.as_deref().unwrap_or("N/A"));
            if let Some(title) = &prof.titulo {
                let _ = writeln!(out, "  - Título: {title}");
            }
            if let Some(category) = prof.categoria_minciencias.as_deref().filter(|c| !c.is_empty())
            {
                let _ = writeln!(out, "  - Categoría MinCiencias: {category}");
            }
            out.push('\n');
        }
        out
    }

    /// Markdown block listing at most ten publications, empty when there are none.
    pub fn format_publications(publications: &[&Publication]) -> String {
        if publications.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n### Publicaciones Relevantes:\n\n");
        for publication in publications.iter().take(MAX_FORMATTED_PUBLICATIONS) {
            let _ = writeln!(
                out,
                "- **{}**",
                publication.titulo.as_deref().unwrap_or("N/A")
            );
            if let Some(journal) = &publication.revista {
                let _ = writeln!(out, "  - Revista: {journal}");
            }
            if let Some(group) = &publication.grupo {
                let _ = writeln!(out, "  - Grupo: {group}");
            }
            out.push('\n');
        }
        out
    }

    fn university(&self) -> &Value {
        self.institutional
            .get("universidad_sabana")
            .unwrap_or(&Value::Null)
    }

    fn university_list(&self, key: &str) -> Vec<Value> {
        self.university()
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

fn load_optional(dir: &Path, file: &str) -> Option<Value> {
    let path = dir.join(file);
    if !path.is_file() {
        debug!(path = %path.display(), "catalog file not present");
        return None;
    }
    read_json(&path)
        .map_err(|e| warn!(error = %e, "ignoring unreadable catalog file"))
        .ok()
}

fn publication_groups(value: Option<&Value>) -> PublicationGroups {
    value
        .and_then(Value::as_object)
        .map(|groups| {
            groups
                .iter()
                .map(|(name, pubs)| {
                    let pubs = pubs.as_array().map(|l| records(l)).unwrap_or_default();
                    (name.clone(), pubs)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn find_group<'a>(groups: &'a PublicationGroups, name: &str) -> &'a [Publication] {
    groups
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, pubs)| pubs.as_slice())
        .unwrap_or(&[])
}
