// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration text through knowledge loading, prompt
//! assembly and a supervised session with per-turn context injection.

use std::sync::Arc;
use std::time::Duration;

use sabius_agent::{Assistant, SessionSupervisor};
use sabius_config::SabiusConfig;
use sabius_context::EXTRA_CONTEXT_PREFIX;
use sabius_core::ChatRole;
use sabius_knowledge::load_scorer;
use sabius_test_utils::{KnowledgeFixture, MockConnector, MockRoom, SessionRecord, TestHarness};
use tokio_util::sync::CancellationToken;

fn config_for(fixture: &KnowledgeFixture, extra: &str) -> SabiusConfig {
    let toml = format!(
        "[agent]\n\
         system_prompt = \"Eres Sabius, asistente de pruebas.\"\n\n\
         [knowledge]\n\
         context_dir = '{}'\n\
         knowledge_base_dir = '{}'\n\
         max_sections = 2\n\n\
         {extra}",
        fixture.context_dir().display(),
        fixture.knowledge_base_dir().display(),
    );
    sabius_config::load_and_validate_str(&toml).expect("test config should be valid")
}

async fn wait_for_session(connector: &MockConnector) -> Arc<SessionRecord> {
    loop {
        if let Some(session) = connector.last_session() {
            return session;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn toml_config_drives_a_full_conversation() {
    let fixture = KnowledgeFixture::convergence_lab().unwrap();
    let config = config_for(&fixture, "[session]\nmax_chat_items = 3\n");

    let scorer = Arc::new(load_scorer(&config.knowledge));
    let assistant = Arc::new(Assistant::from_config(&config, scorer).await.unwrap());
    let connector = MockConnector::new();
    let room = MockRoom::default();
    let cancel = CancellationToken::new();

    let conversation = async {
        let session = wait_for_session(&connector).await;
        let mut last = Vec::new();
        for _ in 0..3 {
            last = session.user_turn("¿Qué servicio de prototipo tienen?").await;
        }
        cancel.cancel();
        (session, last)
    };
    let run = async {
        let mut supervisor = SessionSupervisor::new(&config, Arc::clone(&assistant));
        supervisor.run(&room, &connector, cancel.clone()).await
    };

    let (result, (session, items)) = tokio::join!(run, conversation);
    result.unwrap();

    assert!(session.instructions().starts_with("Eres Sabius, asistente de pruebas."));
    assert!(session.instructions().contains("Edificio Ad Portas"));
    assert_eq!(session.replies().len(), 1);

    // Trimmed to three items, then the context item appended.
    assert_eq!(items.len(), 4);
    assert_eq!(items[2].role, ChatRole::User);
    let context = &items[3];
    assert_eq!(context.role, ChatRole::System);
    assert!(context.text.starts_with(EXTRA_CONTEXT_PREFIX));
    assert!(context.text.contains("prototipado rápido"));
    assert_eq!(session.chat_updates(), 3);
}

#[tokio::test]
async fn unmatched_query_falls_back_to_core() {
    let harness = TestHarness::builder().build().await.unwrap();
    let context = harness.assistant.assembler().relevant_context("xyzzy");
    assert!(context.starts_with("## Convergence Lab"));
}

#[tokio::test]
async fn unmatched_query_without_fallback_names_available_topics() {
    let fixture = KnowledgeFixture::convergence_lab().unwrap();
    let config = config_for(&fixture, "fallback_entry = \"\"\n");
    let scorer = Arc::new(load_scorer(&config.knowledge));
    let assistant = Assistant::from_config(&config, scorer).await.unwrap();

    let prompt = assistant.instructions_for("xyzzy");
    assert!(prompt.contains(
        "Temas disponibles: core, eventos, servicios, faculty_professors, research_publications"
    ));
}

#[tokio::test]
async fn session_start_prompt_lists_every_entry() {
    let harness = TestHarness::builder()
        .with_system_prompt("Preámbulo de prueba")
        .build()
        .await
        .unwrap();
    let prompt = harness.assistant.instructions();
    assert!(prompt.starts_with("Preámbulo de prueba"));
    for label in ["[CORE]", "[EVENTOS]", "[SERVICIOS]", "[FACULTY_PROFESSORS]"] {
        assert!(prompt.contains(label), "missing {label}");
    }
}

#[tokio::test(start_paused = true)]
async fn short_context_is_not_injected_into_chat() {
    let fixture = KnowledgeFixture::empty().unwrap();
    fixture
        .write_context("core", "Lab", &["lab"], "Convergence Lab.")
        .unwrap();
    fixture
        .write_context("horario", "Horario", &["horario"], "Lunes a viernes.")
        .unwrap();
    let config = config_for(&fixture, "");

    let scorer = Arc::new(load_scorer(&config.knowledge));
    let assistant = Arc::new(Assistant::from_config(&config, scorer).await.unwrap());
    let connector = MockConnector::new();
    let room = MockRoom::default();
    let cancel = CancellationToken::new();

    let conversation = async {
        let session = wait_for_session(&connector).await;
        let items = session.user_turn("¿Cuál es el horario?").await;
        cancel.cancel();
        items
    };
    let run = async {
        let mut supervisor = SessionSupervisor::new(&config, Arc::clone(&assistant));
        supervisor.run(&room, &connector, cancel.clone()).await
    };

    let (result, items) = tokio::join!(run, conversation);
    result.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].role, ChatRole::User);
}
