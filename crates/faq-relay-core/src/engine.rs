//! The query resolution pipeline.
//!
//! [`answer`] is the core entry point that all frontends (CLI, HTTP)
//! delegate to. One request runs strictly sequentially:
//!
//! 1. Reject an empty question before any I/O.
//! 2. Fetch the knowledge-base snapshot from the [`KnowledgeStore`].
//! 3. Normalize the question and select the best candidate.
//! 4. Apply the confidence threshold ([`Decision::for_match`]).
//! 5. On escalation, dispatch to the [`AnswerGenerator`], exactly once,
//!    absorbing any failure into the unresolved path.
//! 6. Record provenance (best-effort append) and return the outcome.
//!
//! There is no shared mutable in-process state: each request operates on
//! its own fetched snapshot, so concurrent requests interleave freely.

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::models::{KnowledgeEntry, ResolutionOutcome, UnansweredRecord};
use crate::normalize::Normalizer;
use crate::resolve::{AnswerGenerator, Decision, GeneratedPersistence};
use crate::score::Scorer;
use crate::select::select_best;
use crate::store::KnowledgeStore;

/// Tuning parameters for one resolution run, decoupled from application
/// config.
pub struct EngineOptions {
    /// Minimum score required to accept a stored match (inclusive).
    pub threshold: f64,
    /// Similarity scorer (metric choice and component weights).
    pub scorer: Scorer,
    /// Normalizer applied identically to the question and every candidate.
    pub normalizer: Normalizer,
    /// Whether generated answers are appended as entries or quarantined.
    pub persist_generated: GeneratedPersistence,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            scorer: Scorer::default(),
            normalizer: Normalizer::new(),
            persist_generated: GeneratedPersistence::default(),
        }
    }
}

/// Resolve one question against the store, with generative fallback.
///
/// # Errors
///
/// - the question is empty or whitespace-only (rejected before any I/O);
/// - the knowledge-base fetch fails. A fetch failure is fatal for the
///   request: treating it as an empty snapshot would route every query to
///   the fallback and mask an infrastructure outage.
///
/// Fallback-service and provenance-write failures never surface here; they
/// degrade to [`ResolutionOutcome::Unresolved`] and a warning log
/// respectively.
pub async fn answer<S, G>(
    store: &S,
    generator: &G,
    opts: &EngineOptions,
    question: &str,
) -> Result<ResolutionOutcome>
where
    S: KnowledgeStore + ?Sized,
    G: AnswerGenerator + ?Sized,
{
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let snapshot = store
        .fetch_entries()
        .await
        .context("failed to fetch knowledge-base entries")?;

    let query = opts.normalizer.prepare(question);
    let best = select_best(&query, &snapshot, &opts.normalizer, &opts.scorer);
    let score = best.score;
    debug!(
        score,
        candidates = snapshot.len(),
        threshold = opts.threshold,
        "selected best match"
    );

    let outcome = match (Decision::for_match(&best, opts.threshold), best.entry) {
        (Decision::Accept, Some(entry)) => ResolutionOutcome::Answered {
            answer: entry.answer,
            matched_question: entry.question,
            score,
        },
        _ => escalate(generator, question).await,
    };

    record_provenance(store, &outcome, question, opts.persist_generated).await;

    Ok(outcome)
}

/// Dispatch to the fallback service, absorbing every failure into the
/// unresolved path. Exactly one attempt per request: a retry would mean a
/// duplicate externally billed call.
async fn escalate<G: AnswerGenerator + ?Sized>(
    generator: &G,
    question: &str,
) -> ResolutionOutcome {
    match generator.generate(question).await {
        Ok(text) if !text.trim().is_empty() => ResolutionOutcome::Generated { answer: text },
        Ok(_) => {
            warn!("fallback service returned an empty answer");
            ResolutionOutcome::Unresolved
        }
        Err(err) => {
            warn!(error = %err, "fallback service call failed");
            ResolutionOutcome::Unresolved
        }
    }
}

/// Persist the write implied by an outcome.
///
/// Best-effort and fire-and-forget: append failures are logged and never
/// affect the response already computed. `Answered` writes nothing: the
/// existing knowledge is untouched.
pub async fn record_provenance<S: KnowledgeStore + ?Sized>(
    store: &S,
    outcome: &ResolutionOutcome,
    question: &str,
    persist_generated: GeneratedPersistence,
) {
    let write = match outcome {
        ResolutionOutcome::Answered { .. } => return,
        ResolutionOutcome::Generated { answer } => match persist_generated {
            GeneratedPersistence::Append => {
                store
                    .append_entry(&KnowledgeEntry {
                        question: question.to_string(),
                        answer: answer.clone(),
                    })
                    .await
            }
            GeneratedPersistence::ReviewOnly => {
                store
                    .append_unanswered(&UnansweredRecord {
                        question: question.to_string(),
                    })
                    .await
            }
        },
        ResolutionOutcome::Unresolved => {
            store
                .append_unanswered(&UnansweredRecord {
                    question: question.to_string(),
                })
                .await
        }
    };

    if let Err(err) = write {
        warn!(error = %err, "provenance write failed");
    }
}
