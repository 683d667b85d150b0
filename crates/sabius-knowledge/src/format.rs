// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of the faculty and research knowledge-base files.

use serde_json::Value;

use crate::types::{Professor, Publication, display_value, records};

/// Professors listed in the faculty entry.
const MAX_PROFESSORS: usize = 30;
/// Research units listed in the publications entry.
const MAX_UNITS: usize = 5;
const MAX_PUBLICATIONS_PER_UNIT: usize = 8;
const MAX_PUBLICATIONS: usize = 30;

pub const NO_FACULTY_DATA: &str = "No hay datos de profesores disponibles.";
pub const NO_RESEARCH_DATA: &str = "No hay datos de publicaciones disponibles.";

/// Render `faculty_professors.json`.
///
/// Accepts either a document with `metadata` and `professors`, or a bare
/// array of professor records.
pub fn format_faculty(data: &Value) -> String {
    let mut lines = Vec::new();

    match data {
        Value::Object(doc) if doc.contains_key("metadata") => {
            let metadata = doc.get("metadata").unwrap_or(&Value::Null);
            let description = metadata
                .get("description")
                .map(display_value)
                .unwrap_or_else(|| "Profesores de Universidad de La Sabana".to_string());
            let total = metadata.get("total").map(display_value).unwrap_or_else(|| "0".into());
            lines.push(format!("📚 {description}"));
            lines.push(format!("Total de profesores: {total}\n"));

            let professors: Vec<Professor> = doc
                .get("professors")
                .and_then(Value::as_array)
                .map(|list| records(&list[..list.len().min(MAX_PROFESSORS)]))
                .unwrap_or_default();
            for prof in professors {
                lines.push(format!(
                    "- {} | Categoría: {} | País: {} | Pregrado: {}",
                    prof.nombre.as_deref().unwrap_or("Sin nombre"),
                    or_na(&prof.categoria_institucional),
                    or_na(&prof.pais),
                    or_na(&prof.pregrado),
                ));
            }
        }
        Value::Array(list) => {
            lines.push(format!("Total de profesores registrados: {}\n", list.len()));
            let professors: Vec<Professor> = records(&list[..list.len().min(MAX_PROFESSORS)]);
            for prof in professors {
                lines.push(format!(
                    "- {} (Categoría: {})",
                    prof.nombre.as_deref().unwrap_or("Sin nombre"),
                    or_na(&prof.categoria_institucional),
                ));
            }
        }
        _ => {}
    }

    if lines.is_empty() {
        NO_FACULTY_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

/// Render `research_publications.json`.
///
/// Documents list up to five units in file order, eight publications per
/// unit and thirty overall. Bare arrays list the first thirty records.
pub fn format_research(data: &Value) -> String {
    let mut lines = Vec::new();

    match data {
        Value::Object(doc) => {
            let metadata = doc.get("metadata").unwrap_or(&Value::Null);
            let field = |key: &str| metadata.get(key).map(display_value).unwrap_or_else(|| "0".into());
            let description = metadata
                .get("description")
                .map(display_value)
                .unwrap_or_else(|| "Productos de investigación".to_string());
            lines.push(format!("📰 {description}"));
            lines.push(format!(
                "Total de publicaciones: {} | Unidades: {} | Grupos: {}\n",
                field("total"),
                field("units"),
                field("groups")
            ));

            let mut listed = 0;
            let units = doc.get("by_unit").and_then(Value::as_object);
            for (unit, publications) in units.into_iter().flatten().take(MAX_UNITS) {
                lines.push(format!("\n🏢 Unidad: {unit}"));
                let Some(list) = publications.as_array() else {
                    continue;
                };
                let publications: Vec<Publication> =
                    records(&list[..list.len().min(MAX_PUBLICATIONS_PER_UNIT)]);
                for publication in publications {
                    lines.push(format!(
                        "  - {} | Revista: {} | Grupo: {}",
                        publication.titulo.as_deref().unwrap_or("Sin título"),
                        or_na(&publication.revista),
                        or_na(&publication.grupo),
                    ));
                    listed += 1;
                    if listed >= MAX_PUBLICATIONS {
                        break;
                    }
                }
                if listed >= MAX_PUBLICATIONS {
                    break;
                }
            }
        }
        Value::Array(list) => {
            lines.push(format!("Total de publicaciones: {}\n", list.len()));
            let publications: Vec<Publication> =
                records(&list[..list.len().min(MAX_PUBLICATIONS)]);
            for publication in publications {
                lines.push(format!(
                    "- {} (Revista: {})",
                    publication.titulo.as_deref().unwrap_or("Sin título"),
                    or_na(&publication.revista),
                ));
            }
        }
        _ => {}
    }

    if lines.is_empty() {
        NO_RESEARCH_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}
