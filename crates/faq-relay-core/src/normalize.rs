//! Text normalization for question matching.
//!
//! Lower-cases with Unicode case folding (Arabic-script text passes through
//! untouched), strips everything outside letters, digits, and whitespace,
//! tokenizes on whitespace, removes a fixed closed-class stop-word set, and
//! optionally stems tokens through a pluggable [`Stemmer`].
//!
//! Normalization must be applied identically to both sides of every
//! comparison, so the selector prepares the incoming question and every
//! candidate question through the same [`Normalizer`].
//!
//! All functions are total and deterministic: malformed input at worst
//! normalizes to an empty string and an empty token list.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Closed-class words removed during tokenization.
///
/// English plus Persian function words; the reference knowledge base mixes
/// both scripts.
const STOP_WORDS: &[&str] = &[
    // English
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "can", "do",
    "does", "for", "from", "how", "i", "in", "is", "it", "my", "of", "on",
    "or", "that", "the", "this", "to", "was", "we", "what", "when", "where",
    "which", "who", "why", "will", "with", "you", "your",
    // Persian
    "و", "در", "به", "از", "که", "را", "با", "این", "آن", "است", "برای",
    "تا", "یا", "هم", "آیا", "چه", "چیست", "من", "شما", "ما", "اگر", "بر",
    "یک", "هر", "کدام", "چگونه",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Per-token stemming hook.
///
/// The default [`IdentityStemmer`] passes tokens through unchanged, which is
/// the correct behavior for scripts without an available stemmer. A stemmer
/// is never a hard dependency of the pipeline.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// No-op stemmer.
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// A question after normalization, ready for scoring.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    /// Lower-cased, allow-listed, whitespace-collapsed text.
    pub text: String,
    /// Stop-word-free, stemmed tokens of `text`.
    pub tokens: Vec<String>,
}

/// Text normalizer with an optional stemming step.
pub struct Normalizer {
    stemmer: Box<dyn Stemmer>,
}

impl Normalizer {
    /// Normalizer with the identity (pass-through) stemmer.
    pub fn new() -> Self {
        Self {
            stemmer: Box::new(IdentityStemmer),
        }
    }

    /// Normalizer with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        Self { stemmer }
    }

    /// Lower-case and strip to the letter/digit/whitespace allow-list,
    /// collapsing whitespace runs to single spaces.
    ///
    /// `char::is_alphanumeric` is Unicode-aware, so Persian and other
    /// non-Latin letters survive; punctuation, symbols, and joiners (ZWNJ)
    /// become word boundaries.
    pub fn normalize(&self, text: &str) -> String {
        let mut cleaned = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_alphanumeric() {
                for lower in c.to_lowercase() {
                    cleaned.push(lower);
                }
            } else {
                cleaned.push(' ');
            }
        }
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalize, split on whitespace, drop stop words, and stem.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .filter(|token| !stop_words().contains(token))
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Normalized text and tokens in one pass, as the selector consumes them.
    pub fn prepare(&self, text: &str) -> NormalizedText {
        let normalized = self.normalize(text);
        let tokens = normalized
            .split_whitespace()
            .filter(|token| !stop_words().contains(token))
            .map(|token| self.stemmer.stem(token))
            .collect();
        NormalizedText {
            text: normalized,
            tokens,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_strip_punctuation() {
        let n = Normalizer::new();
        assert_eq!(
            n.normalize("What IS your Refund-Policy?!"),
            "what is your refund policy"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("  hello \t  world \n"), "hello world");
    }

    #[test]
    fn test_persian_text_preserved() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("سلام، دنیا!"), "سلام دنیا");
    }

    #[test]
    fn test_stop_words_removed() {
        let n = Normalizer::new();
        assert_eq!(
            n.tokenize("what is your refund policy"),
            vec!["refund", "policy"]
        );
    }

    #[test]
    fn test_persian_stop_words_removed() {
        let n = Normalizer::new();
        let tokens = n.tokenize("سیاست بازپرداخت شما چیست");
        assert_eq!(tokens, vec!["سیاست", "بازپرداخت"]);
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        let n = Normalizer::new();
        assert_eq!(n.normalize(""), "");
        assert!(n.tokenize("").is_empty());
        assert_eq!(n.normalize("!!! ??? ..."), "");
        assert!(n.tokenize("!!! ??? ...").is_empty());
    }

    #[test]
    fn test_stop_word_only_input_yields_no_tokens() {
        let n = Normalizer::new();
        assert!(n.tokenize("what is the").is_empty());
        // The normalized text itself is kept for the character metric.
        assert_eq!(n.prepare("what is the").text, "what is the");
    }

    #[test]
    fn test_custom_stemmer_applied() {
        struct SuffixStemmer;
        impl Stemmer for SuffixStemmer {
            fn stem(&self, token: &str) -> String {
                token.strip_suffix('s').unwrap_or(token).to_string()
            }
        }
        let n = Normalizer::with_stemmer(Box::new(SuffixStemmer));
        assert_eq!(n.tokenize("refunds policies"), vec!["refund", "policie"]);
    }

    #[test]
    fn test_deterministic() {
        let n = Normalizer::new();
        let a = n.prepare("How do I reset my password?");
        let b = n.prepare("How do I reset my password?");
        assert_eq!(a.text, b.text);
        assert_eq!(a.tokens, b.tokens);
    }
}
