//! Core data models used throughout FAQ Relay.
//!
//! These types represent the knowledge-base rows, match results, and
//! resolution outcomes that flow through the query resolution pipeline.
//! They exist only for the duration of one request; the only durable state
//! lives in the external store.

use serde::{Deserialize, Serialize};

/// One row of the externally stored knowledge base.
///
/// Question and answer text are free-form natural language. No uniqueness is
/// enforced; duplicate questions are legal, and the selector keeps the first
/// row with the highest score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

/// The single best candidate for an incoming question.
///
/// `entry` is `None` iff the candidate set was empty. `score` is always in
/// `[0.0, 1.0]`; exactly `0.0` means either an empty candidate set or total
/// dissimilarity.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub entry: Option<KnowledgeEntry>,
    pub score: f64,
}

/// How a question was resolved.
///
/// Exactly one of the stored match or the fallback generation contributes the
/// primary answer, never both. This drives both the HTTP response payload and
/// the provenance write decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// A stored entry met the confidence threshold.
    Answered {
        answer: String,
        matched_question: String,
        score: f64,
    },
    /// No stored entry was confident enough; the fallback service produced
    /// an answer.
    Generated { answer: String },
    /// Neither a confident match nor a usable generated answer exists.
    Unresolved,
}

/// A question persisted for later manual curation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnansweredRecord {
    pub question: String,
}
