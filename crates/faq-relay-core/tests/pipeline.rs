//! End-to-end resolution scenarios over the in-memory store.

use anyhow::{bail, Result};
use async_trait::async_trait;

use faq_relay_core::engine::{answer, EngineOptions};
use faq_relay_core::models::{KnowledgeEntry, ResolutionOutcome};
use faq_relay_core::resolve::AnswerGenerator;
use faq_relay_core::score::{Scorer, TokenMetric};
use faq_relay_core::store::memory::InMemoryStore;

struct StaticGenerator(&'static str);

#[async_trait]
impl AnswerGenerator for StaticGenerator {
    async fn generate(&self, _question: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct OfflineGenerator;

#[async_trait]
impl AnswerGenerator for OfflineGenerator {
    async fn generate(&self, _question: &str) -> Result<String> {
        bail!("connection refused")
    }
}

fn entry(question: &str, answer: &str) -> KnowledgeEntry {
    KnowledgeEntry {
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

fn opts_with_threshold(threshold: f64) -> EngineOptions {
    EngineOptions {
        threshold,
        ..EngineOptions::default()
    }
}

#[tokio::test]
async fn exact_question_is_answered_from_the_store() {
    let store = InMemoryStore::with_entries(vec![entry("what is your refund policy", "30 days")]);

    let outcome = answer(
        &store,
        &OfflineGenerator,
        &opts_with_threshold(0.7),
        "what is your refund policy",
    )
    .await
    .unwrap();

    match outcome {
        ResolutionOutcome::Answered {
            answer,
            matched_question,
            score,
        } => {
            assert_eq!(answer, "30 days");
            assert_eq!(matched_question, "what is your refund policy");
            assert!((score - 1.0).abs() < 1e-9);
        }
        other => panic!("expected Answered, got {other:?}"),
    }
}

#[tokio::test]
async fn phrasing_variation_still_matches() {
    let store = InMemoryStore::with_entries(vec![
        entry("how do i reset my password", "Use the reset link in settings."),
        entry("what is your refund policy", "30 days"),
    ]);

    let outcome = answer(
        &store,
        &OfflineGenerator,
        &opts_with_threshold(0.6),
        "What is your refund policy?",
    )
    .await
    .unwrap();

    match outcome {
        ResolutionOutcome::Answered { answer, .. } => assert_eq!(answer, "30 days"),
        other => panic!("expected Answered, got {other:?}"),
    }
}

#[tokio::test]
async fn unrelated_question_with_offline_fallback_records_unanswered() {
    let store = InMemoryStore::with_entries(vec![entry("what is your refund policy", "30 days")]);

    let outcome = answer(
        &store,
        &OfflineGenerator,
        &opts_with_threshold(0.7),
        "completely unrelated text",
    )
    .await
    .unwrap();

    assert_eq!(outcome, ResolutionOutcome::Unresolved);
    let unanswered = store.unanswered();
    assert_eq!(unanswered.len(), 1);
    assert_eq!(unanswered[0].question, "completely unrelated text");
    // The knowledge base itself is untouched.
    assert_eq!(store.entries().len(), 1);
}

#[tokio::test]
async fn empty_knowledge_base_falls_back_and_grows() {
    let store = InMemoryStore::new();

    let outcome = answer(
        &store,
        &StaticGenerator("Hi there!"),
        &opts_with_threshold(0.7),
        "hello",
    )
    .await
    .unwrap();

    assert_eq!(
        outcome,
        ResolutionOutcome::Generated {
            answer: "Hi there!".to_string()
        }
    );
    assert_eq!(store.entries(), vec![entry("hello", "Hi there!")]);
}

#[tokio::test]
async fn empty_question_is_an_input_error() {
    let store = InMemoryStore::new();
    let err = answer(&store, &OfflineGenerator, &opts_with_threshold(0.7), "")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
    assert!(store.unanswered().is_empty());
}

#[tokio::test]
async fn duplicate_questions_resolve_to_the_first_row() {
    let store = InMemoryStore::with_entries(vec![
        entry("What is your refund policy?", "first answer"),
        entry("what is your refund policy", "second answer"),
    ]);

    let outcome = answer(
        &store,
        &OfflineGenerator,
        &opts_with_threshold(0.7),
        "what is your refund policy",
    )
    .await
    .unwrap();

    match outcome {
        ResolutionOutcome::Answered { answer, .. } => assert_eq!(answer, "first answer"),
        other => panic!("expected Answered, got {other:?}"),
    }
}

#[tokio::test]
async fn threshold_boundary_is_inclusive() {
    // An exact match scores exactly 1.0; with the threshold also at 1.0 the
    // match must still be accepted, not escalated.
    let store = InMemoryStore::with_entries(vec![entry("hello world", "hi")]);

    let outcome = answer(
        &store,
        &OfflineGenerator,
        &opts_with_threshold(1.0),
        "hello world",
    )
    .await
    .unwrap();

    assert!(matches!(outcome, ResolutionOutcome::Answered { .. }));
}

#[tokio::test]
async fn cosine_metric_runs_the_same_pipeline() {
    let store = InMemoryStore::with_entries(vec![entry("what is your refund policy", "30 days")]);
    let opts = EngineOptions {
        threshold: 0.7,
        scorer: Scorer::new(0.5, 0.5, TokenMetric::Cosine),
        ..EngineOptions::default()
    };

    let outcome = answer(&store, &OfflineGenerator, &opts, "what is your refund policy")
        .await
        .unwrap();

    assert!(matches!(outcome, ResolutionOutcome::Answered { .. }));
}
