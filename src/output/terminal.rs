// Colored terminal output for benchmark averages and comparison summaries.

use std::collections::HashMap;

use colored::Colorize;

use crate::matrix::ComparisonMatrix;
use crate::models::benchmark::BenchmarkItem;

/// Display average similarity per model, in the given (ranked) order.
pub fn display_averages(models: &[String], averages: &HashMap<String, Option<f64>>) {
    println!("\n{}", "=== Average Jaccard Similarity ===".bold());
    println!();

    for (i, model) in models.iter().enumerate() {
        match averages.get(model).copied().flatten() {
            Some(avg) => println!(
                "  {:>2}. {:<32} {}",
                i + 1,
                model.bold(),
                colorize_score(avg)
            ),
            None => println!(
                "  {:>2}. {:<32} {}",
                i + 1,
                model.bold(),
                "no scored images".dimmed()
            ),
        }
    }
    println!();
}

/// Display the items where `model` did worst, with a preview of the tokens
/// it missed.
pub fn display_worst_items(model: &str, items: &[BenchmarkItem], limit: usize) {
    let mut scored: Vec<(&BenchmarkItem, f64)> = items
        .iter()
        .filter(|item| item.ground_truth_issue.is_none())
        .filter_map(|item| item.model_results.get(model).map(|r| (item, r.similarity)))
        .collect();
    if scored.is_empty() {
        return;
    }
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("  Lowest scores for {}:", model.bold());
    for (item, score) in scored.into_iter().take(limit) {
        let missing: Vec<&str> = item.model_results[model]
            .missing_tokens()
            .iter()
            .map(String::as_str)
            .collect();
        let preview = super::truncate_chars(&missing.join(" "), 60);
        println!(
            "    #{:<5} {}  missing: {}",
            item.id,
            colorize_score(score),
            preview.dimmed()
        );
    }
    println!();
}

/// One-line summary of a document's comparison matrix.
pub fn display_matrix_summary(document: &str, matrix: &ComparisonMatrix) {
    let totals: Vec<String> = matrix
        .models
        .iter()
        .zip(&matrix.row_totals)
        .map(|(m, t)| format!("{m}={t}"))
        .collect();
    println!("  {}  tokens: {}", document, totals.join(", ").dimmed());
}

/// Color a similarity score: green when close to ground truth, red when far.
fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.9 {
        text.green()
    } else if score >= 0.7 {
        text.yellow()
    } else {
        text.red()
    }
}
