// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sanity checks for the fixtures and mocks themselves.

use std::sync::Arc;

use sabius_core::{
    ChatItem, ConnectionState, HealthStatus, ModelSpec, RealtimeConnector, RealtimeModel,
    TurnHandler, VoiceRoom, VoiceSession,
};
use sabius_knowledge::KnowledgeStore;
use sabius_test_utils::{KnowledgeFixture, MockConnector, MockRoom, SessionScript, TestHarness};

fn spec() -> ModelSpec {
    ModelSpec {
        model: "test-model".into(),
        voice: "ash".into(),
        temperature: 0.6,
        max_response_tokens: 2048,
    }
}

struct Echo;

#[async_trait::async_trait]
impl TurnHandler for Echo {
    async fn on_user_turn_completed(
        &self,
        chat: Vec<ChatItem>,
        _message: &ChatItem,
    ) -> Vec<ChatItem> {
        chat
    }
}

#[test]
fn convergence_lab_fixture_loads_every_entry() {
    let fixture = KnowledgeFixture::convergence_lab().unwrap();
    let store = KnowledgeStore::load(fixture.context_dir(), fixture.knowledge_base_dir());
    let ids: Vec<&str> = store.ids().collect();
    assert_eq!(
        ids,
        vec!["core", "eventos", "servicios", "faculty_professors", "research_publications"]
    );
}

#[test]
fn malformed_context_file_is_skipped() {
    let fixture = KnowledgeFixture::empty().unwrap();
    fixture
        .write_context("core", "Core", &["lab"], "Contenido")
        .unwrap();
    fixture.write_raw_context("roto.json", "{ no es json").unwrap();
    let store = KnowledgeStore::load(fixture.context_dir(), fixture.knowledge_base_dir());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn connector_fails_then_succeeds() {
    let connector = MockConnector::new();
    connector.fail_next_creates(1);
    assert!(connector.create_model(&spec()).await.is_err());
    assert!(connector.create_model(&spec()).await.is_ok());
    assert_eq!(connector.create_calls(), 2);
    assert_eq!(connector.specs()[1].model, "test-model");
}

#[tokio::test]
async fn scripted_session_reports_health_in_order() {
    let connector = MockConnector::new();
    connector.push_script(SessionScript {
        health: vec![HealthStatus::Degraded("latencia".into())],
        ..SessionScript::default()
    });
    let room = MockRoom::default();
    let model = connector.create_model(&spec()).await.unwrap();
    let session = model
        .start_session(&room, "instrucciones", Arc::new(Echo))
        .await
        .unwrap();

    assert_eq!(
        session.health_check().await.unwrap(),
        HealthStatus::Degraded("latencia".into())
    );
    assert_eq!(session.health_check().await.unwrap(), HealthStatus::Healthy);

    session.generate_reply("hola").await.unwrap();
    session.stop().await.unwrap();
    let record = connector.last_session().unwrap();
    assert_eq!(record.instructions(), "instrucciones");
    assert_eq!(record.replies(), vec!["hola".to_string()]);
    assert_eq!(record.health_checks(), 2);
    assert_eq!(record.stops(), 1);
}

#[tokio::test]
async fn room_reconnects_after_refusals() {
    let room = MockRoom::new("sala");
    room.disconnect();
    room.fail_next_connects(1);
    assert!(room.connect().await.is_err());
    assert_eq!(room.connection_state(), ConnectionState::Disconnected);
    room.connect().await.unwrap();
    assert_eq!(room.connection_state(), ConnectionState::Connected);
    assert_eq!(room.connect_calls(), 2);
}

#[tokio::test]
async fn harness_assembles_assistant_over_fixture() {
    let harness = TestHarness::builder()
        .with_system_prompt("Eres Sabius en pruebas.")
        .build()
        .await
        .unwrap();

    assert_eq!(harness.scorer.store().len(), 5);
    let prompt = harness.assistant.instructions_for("¿Qué eventos hay?");
    assert!(prompt.starts_with("Eres Sabius en pruebas.\n## Convergence Lab"));
    assert!(prompt.contains("## Eventos"));
}
