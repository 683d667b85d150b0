// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named timeout presets and query kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{default_max_response_tokens, default_vad_threshold};

/// Kind of user query, used to pick a response timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum QueryKind {
    Greeting,
    Simple,
    Complex,
    /// Questions answered from the research knowledge base. Also accepts
    /// `pure`, the name older deployments used.
    #[strum(to_string = "knowledge", serialize = "pure")]
    Knowledge,
}

/// Named bundle of response timeouts, from most eager to most patient.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPreset {
    NoStimulus,
    Instant,
    UltraFast,
    Fast,
    Balanced,
    Thorough,
}

/// Values a preset sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetValues {
    pub greeting_secs: f64,
    pub simple_query_secs: f64,
    pub complex_query_secs: f64,
    pub knowledge_query_secs: f64,
    pub silence_duration_ms: u64,
    pub vad_threshold: f64,
    pub max_response_tokens: u32,
}

impl TimeoutPreset {
    pub fn values(self) -> PresetValues {
        let (greeting, simple, complex, knowledge, silence_ms, vad) = match self {
            Self::NoStimulus => (0.5, 0.5, 1.5, 1.0, 5, 0.001),
            Self::Instant => (1.0, 1.0, 3.0, 2.0, 10, 0.01),
            Self::UltraFast => (5.0, 3.0, 10.0, 8.0, 100, 0.1),
            Self::Fast => (8.0, 5.0, 15.0, 12.0, 300, 0.15),
            Self::Balanced => (15.0, 10.0, 25.0, 20.0, 500, 0.2),
            Self::Thorough => (30.0, 20.0, 60.0, 45.0, 2000, default_vad_threshold()),
        };
        let max_response_tokens = match self {
            Self::Thorough => 4096,
            _ => default_max_response_tokens(),
        };
        PresetValues {
            greeting_secs: greeting,
            simple_query_secs: simple,
            complex_query_secs: complex,
            knowledge_query_secs: knowledge,
            silence_duration_ms: silence_ms,
            vad_threshold: vad,
            max_response_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn presets_parse_from_snake_case() {
        assert_eq!(
            TimeoutPreset::from_str("no_stimulus").unwrap(),
            TimeoutPreset::NoStimulus
        );
        assert_eq!(
            TimeoutPreset::from_str("ultra_fast").unwrap(),
            TimeoutPreset::UltraFast
        );
        assert!(TimeoutPreset::from_str("glacial").is_err());
    }

    #[test]
    fn presets_grow_more_patient() {
        let greetings: Vec<f64> = TimeoutPreset::iter()
            .map(|p| p.values().greeting_secs)
            .collect();
        assert!(greetings.windows(2).all(|w| w[0] < w[1]), "{greetings:?}");
    }

    #[test]
    fn only_thorough_raises_token_limit() {
        for preset in TimeoutPreset::iter() {
            let expected = if preset == TimeoutPreset::Thorough {
                4096
            } else {
                2048
            };
            assert_eq!(preset.values().max_response_tokens, expected, "{preset}");
        }
    }

    #[test]
    fn complex_queries_always_get_the_longest_timeout() {
        for preset in TimeoutPreset::iter() {
            let v = preset.values();
            assert!(v.complex_query_secs >= v.knowledge_query_secs);
            assert!(v.knowledge_query_secs >= v.simple_query_secs);
        }
    }

    #[test]
    fn query_kind_parses_names() {
        assert_eq!(QueryKind::from_str("knowledge").unwrap(), QueryKind::Knowledge);
        assert_eq!(QueryKind::Greeting.to_string(), "greeting");
    }

    #[test]
    fn pure_is_an_alias_for_knowledge() {
        assert_eq!(QueryKind::from_str("pure").unwrap(), QueryKind::Knowledge);
        assert_eq!(QueryKind::Knowledge.to_string(), "knowledge");
    }
}
