// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge data written to a temporary directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sabius_config::model::KnowledgeConfig;
use sabius_knowledge::catalog::INSTITUTIONAL_FILE;
use sabius_knowledge::loader::{FACULTY_FILE, RESEARCH_FILE};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Context and knowledge-base directories under a temp dir that is removed
/// on drop.
pub struct KnowledgeFixture {
    _dir: TempDir,
    context_dir: PathBuf,
    knowledge_base_dir: PathBuf,
}

impl KnowledgeFixture {
    /// Empty context and knowledge-base directories.
    pub fn empty() -> io::Result<Self> {
        let dir = TempDir::new()?;
        let context_dir = dir.path().join("context");
        let knowledge_base_dir = dir.path().join("knowledge_base");
        fs::create_dir_all(&context_dir)?;
        fs::create_dir_all(&knowledge_base_dir)?;
        Ok(Self {
            _dir: dir,
            context_dir,
            knowledge_base_dir,
        })
    }

    /// A small Convergence Lab data set: `core`, `servicios` and `eventos`
    /// context files plus faculty, research and institutional files.
    pub fn convergence_lab() -> io::Result<Self> {
        let fixture = Self::empty()?;
        fixture.write_context(
            "core",
            "Convergence Lab",
            &["convergence", "lab", "laboratorio", "ubicación"],
            "El Convergence Lab es el laboratorio de innovación de la Universidad de La Sabana, \
             ubicado en el Edificio Ad Portas, Eje 17, Piso 3.",
        )?;
        fixture.write_context(
            "servicios",
            "Servicios del Lab",
            &["servicio", "prototipo", "mentoría"],
            "Ofrecemos prototipado rápido, mentorías a emprendedores y acompañamiento a \
             proyectos de investigación aplicada con aliados de la industria.",
        )?;
        fixture.write_context(
            "eventos",
            "Eventos",
            &["evento", "taller", "hackathon"],
            "Cada semestre se realizan talleres abiertos y un hackathon de innovación social.",
        )?;
        fixture.write_knowledge_base(
            FACULTY_FILE,
            &json!({
                "metadata": {"total": 2},
                "professors": [
                    {"nombre": "Ana Gómez", "titulo": "PhD Inteligencia Artificial", "categoria_minciencias": "Senior"},
                    {"nombre": "Luis Paz", "titulo": "MSc Enfermería", "grupo_url": "https://x/grupo-cuidado"}
                ]
            }),
        )?;
        fixture.write_knowledge_base(
            RESEARCH_FILE,
            &json!({
                "metadata": {"total": 2},
                "by_unit": {
                    "Ingeniería": [
                        {"titulo": "Redes neuronales para cultivos", "revista": "IEEE", "grupo": "GIA"}
                    ],
                    "Enfermería": [
                        {"titulo": "Cuidado paliativo", "revista": "Lancet", "grupo": "Cuidado"}
                    ]
                }
            }),
        )?;
        fixture.write_knowledge_base(
            INSTITUTIONAL_FILE,
            &json!({
                "universidad_sabana": {
                    "investigacion_innovacion": {"focos": ["Salud", "IA"]}
                },
                "centro_emprendimiento": {
                    "casos_exito": [{"nombre": "AgroSense", "empresa": "AgroSense SAS"}]
                }
            }),
        )?;
        Ok(fixture)
    }

    pub fn context_dir(&self) -> &Path {
        &self.context_dir
    }

    pub fn knowledge_base_dir(&self) -> &Path {
        &self.knowledge_base_dir
    }

    /// Write `{id}.json` into the context directory.
    pub fn write_context(
        &self,
        id: &str,
        title: &str,
        keywords: &[&str],
        content: &str,
    ) -> io::Result<PathBuf> {
        let doc = json!({"title": title, "keywords": keywords, "content": content});
        write_json(&self.context_dir.join(format!("{id}.json")), &doc)
    }

    /// Write raw text into the context directory, e.g. a malformed file.
    pub fn write_raw_context(&self, file_name: &str, text: &str) -> io::Result<PathBuf> {
        let path = self.context_dir.join(file_name);
        fs::write(&path, text)?;
        Ok(path)
    }

    pub fn write_knowledge_base(&self, file_name: &str, doc: &Value) -> io::Result<PathBuf> {
        write_json(&self.knowledge_base_dir.join(file_name), doc)
    }

    /// `[knowledge]` section pointing at this fixture.
    pub fn knowledge_config(&self) -> KnowledgeConfig {
        KnowledgeConfig {
            context_dir: self.context_dir.to_string_lossy().into_owned(),
            knowledge_base_dir: self.knowledge_base_dir.to_string_lossy().into_owned(),
            ..KnowledgeConfig::default()
        }
    }
}

fn write_json(path: &Path, doc: &Value) -> io::Result<PathBuf> {
    let text = serde_json::to_string_pretty(doc).map_err(io::Error::other)?;
    fs::write(path, text)?;
    Ok(path.to_path_buf())
}
