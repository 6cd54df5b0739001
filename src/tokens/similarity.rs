// Multiset Jaccard similarity between two documents.
//
// For each token in either document we take the smaller count and the larger
// count. The similarity is:
//
//   sum(min(count_a, count_b)) / sum(max(count_a, count_b))
//
// 0.0 means no shared tokens, 1.0 means the same tokens with the same counts.
// Order and position are ignored, so tables and multi-column layouts read in
// a different order still score 1.0.

use std::collections::BTreeSet;

use super::counts::TokenCounts;

/// Compute the multiset Jaccard similarity of two token counts.
///
/// Two empty documents are identical (1.0), not incomparable.
pub fn jaccard(a: &TokenCounts, b: &TokenCounts) -> f64 {
    let all_tokens: BTreeSet<&str> = a.tokens().chain(b.tokens()).collect();

    let mut intersection: u64 = 0;
    let mut union: u64 = 0;

    for token in all_tokens {
        let count_a = a.get(token);
        let count_b = b.get(token);
        intersection += count_a.min(count_b);
        union += count_a.max(count_b);
    }

    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}
