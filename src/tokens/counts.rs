// TokenCounts: the multiset of tokens in one document.
//
// Backed by a BTreeMap so iteration is always in byte-wise token order. The
// token table CSV and every report built from it are reproducible without an
// extra sort.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tokenize::tokenize;
use crate::document::Document;

/// Token -> occurrence count. Every stored count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCounts {
    counts: BTreeMap<String, u64>,
}

impl TokenCounts {
    /// Count an already-tokenized sequence.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.into()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Tokenize and count a piece of text.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(tokenize(text))
    }

    /// Count every present page of a document. Missing pages contribute nothing.
    pub fn from_document(doc: &Document) -> Self {
        Self::from_text(&doc.present_text())
    }

    /// Build directly from (token, count) pairs. Zero counts are skipped and
    /// repeated tokens are summed.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut counts = BTreeMap::new();
        for (token, count) in pairs {
            if count > 0 {
                *counts.entry(token.into()).or_insert(0) += count;
            }
        }
        Self { counts }
    }

    /// Occurrences of `token`, or 0 if it never appears.
    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of token occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// (token, count) pairs in byte-wise token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Distinct tokens in byte-wise order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_repeated_tokens() {
        let counts = TokenCounts::from_tokens(["a", "b", "a"]);
        assert_eq!(counts.get("a"), 2);
        assert_eq!(counts.get("b"), 1);
        assert_eq!(counts.get("c"), 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_empty_input_is_empty_map() {
        let counts = TokenCounts::from_tokens(Vec::<String>::new());
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_from_text_is_case_insensitive() {
        let counts = TokenCounts::from_text("The the THE cat");
        assert_eq!(counts.get("the"), 3);
        assert_eq!(counts.get("cat"), 1);
    }

    #[test]
    fn test_iterates_in_byte_order() {
        let counts = TokenCounts::from_tokens(["zeta", "alpha", "Zulu", "émile"]);
        let order: Vec<&str> = counts.tokens().collect();
        // Uppercase sorts before lowercase, multi-byte UTF-8 after ASCII
        assert_eq!(order, vec!["Zulu", "alpha", "zeta", "émile"]);
    }

    #[test]
    fn test_from_pairs_skips_zero_counts() {
        let counts = TokenCounts::from_pairs([("a", 2), ("b", 0), ("a", 1)]);
        assert_eq!(counts.get("a"), 3);
        assert!(!counts.contains("b"));
        assert_eq!(counts.len(), 1);
    }
}
