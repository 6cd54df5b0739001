// Cross-model comparison matrix for a single document.
//
// Rows and columns are model names in a caller-supplied order. Cell (row, col)
// answers: "starting from the row model's tokens, how many occurrences does
// the column model add and drop?" Each magnitude is also expressed as a
// percentage of the row model's total token count, so engines that read the
// same page can be compared across documents of different lengths.

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;

use crate::tokens::{DiffMagnitude, TokenCounts};

/// One off-diagonal cell of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixCell {
    pub diff: DiffMagnitude,
    /// `diff.added` as a percentage of the row model's token total. NaN when
    /// the row model produced no tokens.
    pub added_pct: f64,
    /// `diff.removed` as a percentage of the row model's token total. NaN when
    /// the row model produced no tokens.
    pub removed_pct: f64,
}

/// Square diff matrix. Diagonal cells are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMatrix {
    pub models: Vec<String>,
    /// Total token occurrences per model, in `models` order.
    pub row_totals: Vec<u64>,
    pub cells: Vec<Vec<Option<MatrixCell>>>,
}

impl ComparisonMatrix {
    /// Build the matrix over `order`, reading each model's counts from `counts`.
    ///
    /// Every model in `order` must have an entry in `counts`; filter the order
    /// first if some models have no output for this document.
    pub fn build(order: &[String], counts: &HashMap<String, TokenCounts>) -> Result<Self> {
        let rows: Vec<&TokenCounts> = order
            .iter()
            .map(|model| {
                counts
                    .get(model)
                    .ok_or_else(|| anyhow::anyhow!("No token counts for model {model}"))
            })
            .collect::<Result<_>>()?;

        // The row total is the same across a whole row, so compute it once.
        let row_totals: Vec<u64> = rows.iter().map(|c| c.total()).collect();

        let cells = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                rows.iter()
                    .enumerate()
                    .map(|(j, col)| {
                        if i == j {
                            return None;
                        }
                        let diff = DiffMagnitude::between(row, col);
                        Some(MatrixCell {
                            diff,
                            added_pct: percent(diff.added, row_totals[i]),
                            removed_pct: percent(diff.removed, row_totals[i]),
                        })
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            models: order.to_vec(),
            row_totals,
            cells,
        })
    }

    /// Cell for (row model, column model), or `None` on the diagonal or for
    /// unknown names.
    pub fn cell(&self, row: &str, col: &str) -> Option<&MatrixCell> {
        let i = self.models.iter().position(|m| m == row)?;
        let j = self.models.iter().position(|m| m == col)?;
        self.cells[i][j].as_ref()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// `100 * value / total`, or NaN when `total` is zero.
pub fn percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        100.0 * value as f64 / total as f64
    }
}
