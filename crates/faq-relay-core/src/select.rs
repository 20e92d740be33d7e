//! Best-match selection over a knowledge-base snapshot.
//!
//! A linear scan per request, by design: no index is built or cached, since
//! the external store is the source of truth and may change between
//! requests. Candidate order is the store's row order, and ties keep the
//! first candidate encountered.

use crate::models::{KnowledgeEntry, MatchResult};
use crate::normalize::{NormalizedText, Normalizer};
use crate::score::Scorer;

/// Scan `candidates` and return the single best entry with its score.
///
/// Every candidate question is normalized through the same `normalizer`
/// that prepared `query`, keeping both sides of the comparison symmetric.
/// An empty candidate slice yields `{ entry: None, score: 0.0 }`.
pub fn select_best(
    query: &NormalizedText,
    candidates: &[KnowledgeEntry],
    normalizer: &Normalizer,
    scorer: &Scorer,
) -> MatchResult {
    let mut best: Option<&KnowledgeEntry> = None;
    let mut best_score = 0.0_f64;

    for entry in candidates {
        let candidate = normalizer.prepare(&entry.question);
        let score = scorer.score(query, &candidate);
        // Strict comparison keeps the first-seen candidate on ties.
        if best.is_none() || score > best_score {
            best = Some(entry);
            best_score = score;
        }
    }

    MatchResult {
        entry: best.cloned(),
        score: best_score,
    }
}
