//! Resolution policy and the fallback-generation seam.
//!
//! The policy decision is pure and synchronous so the threshold boundary is
//! trivially unit-testable; dispatching to the generative service and
//! recording provenance happen in [`crate::engine`].

use async_trait::async_trait;

use crate::models::MatchResult;

/// What to do with the best match, given the confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Return the stored answer.
    Accept,
    /// Route to the fallback generative service.
    Escalate,
}

impl Decision {
    /// Accept iff an entry exists and its score meets the threshold.
    ///
    /// The comparison is `>=`: a score exactly equal to the threshold is
    /// accepted.
    pub fn for_match(result: &MatchResult, threshold: f64) -> Self {
        if result.entry.is_some() && result.score >= threshold {
            Decision::Accept
        } else {
            Decision::Escalate
        }
    }
}

/// External generative fallback service.
///
/// Implementations are constructor-injected into the engine; no global
/// module-level clients. The engine absorbs every error from this trait
/// into the unresolved path, so implementations may freely propagate
/// transport and decoding failures.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer for the raw (non-normalized) question text.
    ///
    /// The original phrasing and punctuation are preserved in the prompt
    /// for better completion quality.
    async fn generate(&self, question: &str) -> anyhow::Result<String>;
}

/// Whether a generated answer may be appended to the knowledge base.
///
/// Auto-appending doubles as implicit self-training of the knowledge base,
/// which is deliberate but debatable; this makes the choice an explicit,
/// named configuration instead of a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratedPersistence {
    /// Append the question/answer pair as a new knowledge entry.
    #[default]
    Append,
    /// Quarantine: record the question as unanswered for human review
    /// instead of trusting the generated answer as ground truth.
    ReviewOnly,
}
