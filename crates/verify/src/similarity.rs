//! Lexical overlap between two review texts.
//!
//! Jaccard over normalized word sets: insensitive to word order and
//! repetition, which is enough for short reviews where the question is only
//! "was this text posted", not "is this an exact duplicate".

use std::collections::HashSet;

/// Tokens shorter than this are dropped ("a", "is", "to").
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Lowercase, keep only `a-z`, `0-9` and whitespace, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unique normalized tokens of one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: HashSet<String>,
}

impl TokenSet {
    pub fn from_text(text: &str, min_token_len: usize) -> Self {
        let tokens = normalize(text)
            .split(' ')
            .filter(|t| t.len() >= min_token_len)
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// |A ∩ B| / |A ∪ B|, or 0 when either side has no tokens.
    pub fn jaccard(&self, other: &TokenSet) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let intersection = small.tokens.iter().filter(|t| large.contains(t)).count();
        let union = self.len() + other.len() - intersection;
        intersection as f64 / union as f64
    }
}

/// Similarity of two raw texts with the default tokenizer.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_with(a, b, DEFAULT_MIN_TOKEN_LEN)
}

pub fn similarity_with(a: &str, b: &str, min_token_len: usize) -> f64 {
    TokenSet::from_text(a, min_token_len).jaccard(&TokenSet::from_text(b, min_token_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_space() {
        assert_eq!(normalize("  Sturdy   stand,\teasy!! "), "sturdy stand easy");
        assert_eq!(normalize("5/5 Would BUY again"), "55 would buy again");
        assert_eq!(normalize("Très bien"), "trs bien");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn short_tokens_are_dropped() {
        let set = TokenSet::from_text("It is a good stand to use", DEFAULT_MIN_TOKEN_LEN);
        assert_eq!(set.len(), 3);
        assert!(set.contains("good"));
        assert!(set.contains("stand"));
        assert!(set.contains("use"));
        assert!(!set.contains("is"));
    }

    #[test]
    fn repeated_words_count_once() {
        let set = TokenSet::from_text("goat goat GOAT goats", DEFAULT_MIN_TOKEN_LEN);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn jaccard_half_overlap() {
        // {sturdy, stand, easy} vs {sturdy, stand, heavy}: 2 / 4
        assert_eq!(similarity("sturdy stand easy", "sturdy stand heavy"), 0.5);
    }

    #[test]
    fn empty_or_noise_only_scores_zero() {
        assert_eq!(similarity("", "sturdy stand"), 0.0);
        assert_eq!(similarity("sturdy stand", ""), 0.0);
        assert_eq!(similarity("it is ok", "it is ok"), 0.0);
        assert_eq!(similarity("!!!", "???"), 0.0);
    }

    #[test]
    fn identical_text_scores_one() {
        let text = "Great stand for milking my Nigerian Dwarf goats";
        assert_eq!(similarity(text, text), 1.0);
    }

    #[test]
    fn order_and_case_do_not_matter() {
        assert_eq!(similarity("Easy to assemble, sturdy", "STURDY, easy to assemble"), 1.0);
    }

    #[test]
    fn custom_min_token_len() {
        // with min 2, "is" and "ok" count
        assert_eq!(similarity_with("it is ok", "it is ok", 2), 1.0);
        assert_eq!(similarity_with("stand ok", "stand", 6), 0.0);
    }
}
