// Unit tests for the N×N comparison matrix and its HTML rendering.

use std::collections::HashMap;

use ocrbench::matrix::{percent, ComparisonMatrix};
use ocrbench::output::html::render_matrix_page;
use ocrbench::tokens::TokenCounts;

fn counts_for(docs: &[(&str, &str)]) -> (Vec<String>, HashMap<String, TokenCounts>) {
    let order = docs.iter().map(|(m, _)| m.to_string()).collect();
    let counts = docs
        .iter()
        .map(|(m, text)| (m.to_string(), TokenCounts::from_text(text)))
        .collect();
    (order, counts)
}

// ============================================================
// Shape and ordering
// ============================================================

#[test]
fn matrix_follows_configured_order() {
    let (order, counts) = counts_for(&[
        ("textract", "total due 100"),
        ("gemini", "total due 100 usd"),
        ("pdftotext", "total 100"),
    ]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();
    assert_eq!(matrix.models, vec!["textract", "gemini", "pdftotext"]);
    assert_eq!(matrix.row_totals, vec![3, 4, 2]);
    assert_eq!(matrix.cells.len(), 3);
    assert!(matrix.cells.iter().all(|row| row.len() == 3));
}

#[test]
fn diagonal_is_blank_and_everything_else_filled() {
    let (order, counts) = counts_for(&[("a", "x y"), ("b", "x"), ("c", "")]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();
    for (i, row) in matrix.cells.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            assert_eq!(cell.is_none(), i == j, "cell ({i}, {j})");
        }
    }
}

#[test]
fn missing_model_counts_is_an_error() {
    let (_, counts) = counts_for(&[("a", "x")]);
    let order = vec!["a".to_string(), "ghost".to_string()];
    let err = ComparisonMatrix::build(&order, &counts).unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

// ============================================================
// Cell values
// ============================================================

#[test]
fn cells_are_relative_to_the_row_model() {
    let (order, counts) = counts_for(&[("a", "x x y"), ("b", "x z")]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();

    // a -> b: z added once; one x and the y removed
    let ab = matrix.cell("a", "b").unwrap();
    assert_eq!((ab.diff.added, ab.diff.removed), (1, 2));
    assert!((ab.added_pct - 100.0 / 3.0).abs() < 1e-9);
    assert!((ab.removed_pct - 200.0 / 3.0).abs() < 1e-9);

    // b -> a is the mirror image, scaled by b's total
    let ba = matrix.cell("b", "a").unwrap();
    assert_eq!((ba.diff.added, ba.diff.removed), (2, 1));
    assert_eq!(ba.added_pct, 100.0);
    assert_eq!(ba.removed_pct, 50.0);
}

#[test]
fn empty_row_model_gives_nan_percentages() {
    let (order, counts) = counts_for(&[("blank", ""), ("full", "some words")]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();

    let cell = matrix.cell("blank", "full").unwrap();
    assert_eq!(cell.diff.added, 2);
    assert!(cell.added_pct.is_nan());
    assert!(cell.removed_pct.is_nan());

    let reverse = matrix.cell("full", "blank").unwrap();
    assert_eq!(reverse.removed_pct, 100.0);
}

#[test]
fn percent_of_zero_total_is_nan() {
    assert!(percent(0, 0).is_nan());
    assert_eq!(percent(1, 4), 25.0);
}

// ============================================================
// HTML rendering
// ============================================================

#[test]
fn matrix_page_renders_every_model_and_cell() {
    let (order, counts) = counts_for(&[("a", "x x y"), ("b", "x z")]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();
    let page = render_matrix_page("scans/doc.pdf.html", &matrix);

    assert!(page.contains("<title>scans/doc.pdf.html</title>"));
    assert!(page.contains("Total token count: 3"));
    assert!(page.contains("<th><tt>a</tt></th>"));
    assert!(page.contains("<th><tt>b</tt></th>"));
    assert!(page.contains("+1 (+33.33%)"));
    assert!(page.contains("-2 (-66.67%)"));
    assert_eq!(page.matches("<td>&nbsp;</td>").count(), 2);
}

#[test]
fn matrix_page_shows_nan_for_empty_row() {
    let (order, counts) = counts_for(&[("blank", ""), ("full", "word")]);
    let matrix = ComparisonMatrix::build(&order, &counts).unwrap();
    let page = render_matrix_page("doc", &matrix);
    assert!(page.contains("+1 (+NaN%)"));
}
