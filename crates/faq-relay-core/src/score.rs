//! Similarity scoring between normalized questions.
//!
//! Combines a character-affinity metric (Jaro-Winkler) with a token metric
//! (set overlap or a per-comparison term-frequency cosine) as a weighted
//! sum. Both components and the final score are bounded to `[0.0, 1.0]`
//! and symmetric in their arguments.
//!
//! The token metric is defined as `0.0` whenever either side tokenizes to
//! nothing, so stop-word-only or symbol-only questions never divide by zero.
//! Term weighting for the cosine variant is built from exactly the two
//! compared strings; no corpus-wide index exists or is cached.

use std::collections::{HashMap, HashSet};

use crate::normalize::NormalizedText;

/// Winkler prefix scaling factor.
const WINKLER_PREFIX_SCALE: f64 = 0.1;
/// Maximum shared-prefix length rewarded by the Winkler boost.
const WINKLER_MAX_PREFIX: usize = 4;

/// Which token-level metric the scorer combines with Jaro-Winkler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMetric {
    /// Shared tokens divided by the larger token-set size.
    Overlap,
    /// Term-frequency cosine over the two compared strings.
    Cosine,
}

/// Configurable similarity scorer.
///
/// Weights need not sum to one; the combined score is divided by their sum.
/// A useful split is 0.7/0.3 (the default) or 0.5/0.5 between the character
/// and token components.
#[derive(Debug, Clone)]
pub struct Scorer {
    char_weight: f64,
    token_weight: f64,
    metric: TokenMetric,
}

impl Scorer {
    pub fn new(char_weight: f64, token_weight: f64, metric: TokenMetric) -> Self {
        Self {
            char_weight,
            token_weight,
            metric,
        }
    }

    /// Score two normalized questions. Symmetric; always in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` if both weights are zero.
    pub fn score(&self, a: &NormalizedText, b: &NormalizedText) -> f64 {
        let total = self.char_weight + self.token_weight;
        if total <= f64::EPSILON {
            return 0.0;
        }

        let char_sim = jaro_winkler(&a.text, &b.text);
        let token_sim = match self.metric {
            TokenMetric::Overlap => token_overlap(&a.tokens, &b.tokens),
            TokenMetric::Cosine => tf_cosine(&a.tokens, &b.tokens),
        };

        ((self.char_weight * char_sim + self.token_weight * token_sim) / total).clamp(0.0, 1.0)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(0.7, 0.3, TokenMetric::Overlap)
    }
}

/// Jaro-Winkler similarity over char sequences.
///
/// `1.0` for identical strings, `0.0` for completely disjoint ones. The
/// Winkler variant boosts pairs sharing a prefix of up to four characters.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let jaro = jaro_similarity(&a_chars, &b_chars);

    let prefix = a_chars
        .iter()
        .zip(b_chars.iter())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    jaro + prefix as f64 * WINKLER_PREFIX_SCALE * (1.0 - jaro)
}

fn jaro_similarity(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && *ca == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Count transpositions between the matched subsequences.
    let a_seq: Vec<char> = a
        .iter()
        .zip(a_matched.iter())
        .filter(|(_, m)| **m)
        .map(|(c, _)| *c)
        .collect();
    let b_seq: Vec<char> = b
        .iter()
        .zip(b_matched.iter())
        .filter(|(_, m)| **m)
        .map(|(c, _)| *c)
        .collect();
    let transpositions = a_seq
        .iter()
        .zip(b_seq.iter())
        .filter(|(x, y)| x != y)
        .count() as f64
        / 2.0;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions) / m) / 3.0
}

/// Fraction of shared tokens, divided by the larger token-set size.
///
/// `0.0` when either side has no tokens.
pub fn token_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_set: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b.iter().map(String::as_str).collect();
    let shared = a_set.intersection(&b_set).count();
    shared as f64 / a_set.len().max(b_set.len()) as f64
}

/// Term-frequency cosine similarity over the two token lists.
///
/// `0.0` when either side has no tokens.
pub fn tf_cosine(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_freq = term_frequencies(a);
    let b_freq = term_frequencies(b);

    let dot: f64 = a_freq
        .iter()
        .filter_map(|(term, fa)| b_freq.get(term).map(|fb| fa * fb))
        .sum();

    let norm_a: f64 = a_freq.values().map(|f| f * f).sum::<f64>().sqrt();
    let norm_b: f64 = b_freq.values().map(|f| f * f).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        return 0.0;
    }
    dot / denom
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, f64> {
    let mut freq: HashMap<&str, f64> = HashMap::new();
    for token in tokens {
        *freq.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    freq
}
