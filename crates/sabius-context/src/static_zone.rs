// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static zone: the operating preamble placed at the top of every prompt.

use sabius_config::model::AgentConfig;
use sabius_core::SabiusError;
use tracing::{info, warn};

/// Built-in operating instructions used when no prompt is configured.
pub const DEFAULT_PREAMBLE: &str = "# 🧠 Sabius – Asistente del Convergence Lab

## INSTRUCCIONES OPERACIONALES:

1. Responde ÚNICAMENTE con información del contexto proporcionado
2. NO inventes, supongas ni uses información externa
3. Sé conciso y responde directamente a la pregunta
4. NO menciones que respondes \"basado en contexto\"
5. Si no tienes información, di claramente: \"No encuentro esa información\"

## ESTILO DE RESPUESTA:
- Responde de forma natural y directa
- No hagas aclaraciones sobre tus fuentes
- Si es una pregunta sobre un tema disponible, proporciona la información
- Mantén respuestas breves y al punto

## Contacto:
📍 Edificio Ad Portas, Eje 17, Piso 3
📧 convergence.lab@unisabana.edu.co

---

## INFORMACIÓN DISPONIBLE:
";

/// Holds the preamble text for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct StaticZone {
    preamble: String,
}

impl StaticZone {
    /// Loads the preamble from config.
    ///
    /// # Priority
    /// 1. `config.system_prompt_file` -- reads from disk
    /// 2. `config.system_prompt` -- inline string
    /// 3. [`DEFAULT_PREAMBLE`]
    pub async fn new(config: &AgentConfig) -> Result<Self, SabiusError> {
        let preamble = load_preamble(config).await?;
        Ok(Self { preamble })
    }

    /// A zone with fixed text, bypassing config lookup.
    pub fn from_text(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }
}

impl Default for StaticZone {
    fn default() -> Self {
        Self::from_text(DEFAULT_PREAMBLE)
    }
}

async fn load_preamble(config: &AgentConfig) -> Result<String, SabiusError> {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded system prompt from file");
                    return Ok(trimmed.to_string());
                }
                warn!(path = file_path.as_str(), "system prompt file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(ref prompt) = config.system_prompt
        && !prompt.trim().is_empty()
    {
        return Ok(prompt.clone());
    }

    Ok(DEFAULT_PREAMBLE.to_string())
}
