// SPDX-FileCopyrightText: 2026 Sabius Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for loading, indexing and scoring knowledge.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;
use sabius_config::model::KnowledgeConfig;
use sabius_knowledge::{
    KeywordIndex, KnowledgeEntry, KnowledgeStats, KnowledgeStore, RelevanceScorer, load_scorer,
};
use tracing_test::traced_test;

fn write_fixture(root: &Path) {
    let ctx = root.join("context");
    let kb = root.join("kb");
    fs::create_dir_all(&ctx).unwrap();
    fs::create_dir_all(&kb).unwrap();
    fs::write(
        ctx.join("core.json"),
        r#"{"title": "Convergence Lab", "keywords": ["convergence", "laboratorio"], "content": "Edificio Ad Portas, Eje 17, Piso 3"}"#,
    )
    .unwrap();
    fs::write(
        ctx.join("proyectos.json"),
        r#"{"title": "Proyectos", "keywords": ["proyecto", "robótica", "IA"], "content": "Robots sociales y visión artificial"}"#,
    )
    .unwrap();
    fs::write(
        kb.join("faculty_professors.json"),
        r#"{"metadata": {"total": 1}, "professors": [{"nombre": "Ana Gómez", "categoria_institucional": "Titular"}]}"#,
    )
    .unwrap();
}

fn config(root: &Path) -> KnowledgeConfig {
    KnowledgeConfig {
        context_dir: root.join("context").display().to_string(),
        knowledge_base_dir: root.join("kb").display().to_string(),
        ..KnowledgeConfig::default()
    }
}

#[test]
fn load_scorer_ranks_fixture_entries() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let scorer = load_scorer(&config(tmp.path()));

    let ids: Vec<&str> = scorer.store().ids().collect();
    assert_eq!(ids, vec!["core", "proyectos", "faculty_professors"]);

    let top = scorer.select("¿Qué proyectos de robótica tiene el laboratorio?", 3);
    assert_eq!(top[0].id, "proyectos");
    assert_eq!(top[1].id, "core");

    let faculty = scorer.select("¿Quién es profesor titular?", 3);
    assert_eq!(faculty[0].id, "faculty_professors");
    assert!(faculty[0].content.contains("Ana Gómez"));
}

#[test]
fn unmatched_query_uses_configured_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let scorer = load_scorer(&config(tmp.path()));
    let selected = scorer.select("hola", 3);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, "core");

    let mut no_fallback = config(tmp.path());
    no_fallback.fallback_entry = String::new();
    assert!(load_scorer(&no_fallback).select("hola", 3).is_empty());
}

#[test]
#[traced_test]
fn malformed_files_are_logged_and_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    fs::write(tmp.path().join("context/roto.json"), "{ no es json").unwrap();
    fs::write(tmp.path().join("kb/research_publications.json"), "[1, 2").unwrap();

    let scorer = load_scorer(&config(tmp.path()));
    let ids: Vec<&str> = scorer.store().ids().collect();
    assert_eq!(ids, vec!["core", "proyectos", "faculty_professors"]);
    assert!(logs_contain("skipping context file"));
    assert!(logs_contain("skipping knowledge base file"));
}

#[test]
fn missing_data_degrades_to_empty_store() {
    let tmp = tempfile::tempdir().unwrap();
    let scorer = load_scorer(&config(tmp.path()));
    assert!(scorer.store().is_empty());
    assert!(scorer.select("profesor", 3).is_empty());
}

#[test]
fn loading_twice_yields_identical_indices() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let cfg = config(tmp.path());
    let first = load_scorer(&cfg);
    let second = load_scorer(&cfg);
    assert_eq!(first.store(), second.store());
    assert_eq!(first.index(), second.index());
}

#[test]
fn stats_reflect_fixture() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let scorer = load_scorer(&config(tmp.path()));
    let stats = KnowledgeStats::collect(scorer.store(), scorer.index());
    assert_eq!(stats.total_contexts, 3);
    // 2 + 3 + 18 faculty keywords, none shared.
    assert_eq!(stats.total_keywords, 23);
    assert!(stats.estimated_total_tokens > 0);
}

fn keyword() -> impl Strategy<Value = String> {
    "[a-z]{3,8}"
}

fn entries() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(keyword(), 1..5), 1..8)
}

fn build(keyword_sets: &[Vec<String>]) -> RelevanceScorer {
    let store: KnowledgeStore = keyword_sets
        .iter()
        .enumerate()
        .map(|(i, keywords)| KnowledgeEntry::new(format!("e{i}"), format!("E{i}"), keywords, ""))
        .collect();
    RelevanceScorer::new(Arc::new(store))
}

proptest! {
    #[test]
    fn result_count_never_exceeds_max(sets in entries(), query in "[a-z ]{0,40}", max in 0usize..6) {
        let scorer = build(&sets);
        prop_assert!(scorer.score(&query, max).len() <= max);
        prop_assert!(scorer.select(&query, max).len() <= max);
    }

    #[test]
    fn shared_keyword_returns_entry(sets in entries(), pick in any::<prop::sample::Index>()) {
        let scorer = build(&sets);
        let target = pick.index(sets.len());
        let query = format!("pregunta sobre {} por favor", sets[target][0]);
        let want = format!("e{target}");
        let found = scorer.score(&query, sets.len());
        prop_assert!(found.iter().any(|s| s.entry.id == want));
    }

    #[test]
    fn scores_are_non_increasing(sets in entries(), query in "[a-z ]{0,40}") {
        let scorer = build(&sets);
        let scored = scorer.score(&query, sets.len());
        prop_assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn no_match_means_empty(sets in entries()) {
        let scorer = build(&sets);
        // Digits never appear in generated keywords.
        prop_assert!(scorer.score("12345 678", sets.len()).is_empty());
    }

    #[test]
    fn index_is_deterministic(sets in entries()) {
        let a = build(&sets);
        let b = build(&sets);
        prop_assert_eq!(a.index(), b.index());
        prop_assert_eq!(KeywordIndex::build(a.store()), a.index().clone());
    }
}
