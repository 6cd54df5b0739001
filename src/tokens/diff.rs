// Token diffs between a base document and a candidate.
//
// Two views of the same comparison:
//
// - `TokenDiff` is set-level: which tokens appeared, disappeared, or changed
//   count. Used for highlighting and for the "missing tokens" legend.
// - `DiffMagnitude` is occurrence-level: how many token occurrences the
//   candidate gained or lost. Used for the model comparison matrix.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::counts::TokenCounts;

/// Tokens that differ between a base document and a candidate.
///
/// The three sets are disjoint. A token with the same nonzero count on both
/// sides is in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDiff {
    /// Present in the base, absent from the candidate.
    pub removed: BTreeSet<String>,
    /// Present in both, with different counts.
    pub changed: BTreeSet<String>,
    /// Absent from the base, present in the candidate.
    pub added: BTreeSet<String>,
}

impl TokenDiff {
    /// Partition every token of `base` and `candidate`.
    pub fn between(base: &TokenCounts, candidate: &TokenCounts) -> Self {
        let mut diff = Self::default();
        let all_tokens: BTreeSet<&str> = base.tokens().chain(candidate.tokens()).collect();

        for token in all_tokens {
            match (base.get(token), candidate.get(token)) {
                (0, c) if c > 0 => {
                    diff.added.insert(token.to_string());
                }
                (b, 0) if b > 0 => {
                    diff.removed.insert(token.to_string());
                }
                (b, c) if b != c => {
                    diff.changed.insert(token.to_string());
                }
                _ => {}
            }
        }

        diff
    }

    /// True when the two documents have identical token counts.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.changed.is_empty() && self.added.is_empty()
    }
}

/// Occurrence-level churn from a reference document to a candidate.
///
/// Asymmetric: swapping reference and candidate swaps `added` and `removed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffMagnitude {
    /// Extra occurrences in the candidate.
    pub added: u64,
    /// Occurrences of the reference missing from the candidate.
    pub removed: u64,
}

impl DiffMagnitude {
    pub fn between(reference: &TokenCounts, candidate: &TokenCounts) -> Self {
        let mut added = 0;
        let mut removed = 0;

        for (token, count) in reference.iter() {
            let other = candidate.get(token);
            added += other.saturating_sub(count);
            removed += count.saturating_sub(other);
        }

        for (token, count) in candidate.iter() {
            if !reference.contains(token) {
                added += count;
            }
        }

        Self { added, removed }
    }
}
