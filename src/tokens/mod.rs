// Token engine: tokenizing, counting, similarity, diffs, and highlighting.

pub mod tokenize;
pub mod counts;
pub mod similarity;
pub mod diff;
pub mod highlight;

pub use counts::TokenCounts;
pub use diff::{DiffMagnitude, TokenDiff};
pub use highlight::{Mark, Segment};
pub use similarity::jaccard;
pub use tokenize::tokenize;
