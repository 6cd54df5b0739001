// HTML reports: the per-document model comparison matrix and the benchmark
// results page.
//
// Pages are small and static, so they are assembled with `format!` rather
// than a template engine. Every piece of document or model text goes through
// `escape_html`; the only markup we emit around document text is the
// highlight spans from `TokenDiff::segments`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::format_percent;
use crate::matrix::ComparisonMatrix;
use crate::models::benchmark::BenchmarkItem;
use crate::tokens::{Segment, TokenDiff};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
td, th { padding: 0.3em 0.6em; vertical-align: top; }
pre { white-space: pre-wrap; max-width: 60em; }
.added { background: #c8f7c5; }
.changed { background: #fbe7a1; }
.removed { background: #f7c5c5; }
.flagged { color: #b35900; }
.issue { color: #999; }
";

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render candidate text with diff highlights as HTML. Plain text is
/// escaped; highlighted words are wrapped in `<span class="...">`.
pub fn highlight_html(diff: &TokenDiff, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in diff.segments(text) {
        match segment {
            Segment::Plain(plain) => out.push_str(&escape_html(plain)),
            Segment::Marked(mark, word) => out.push_str(&format!(
                r#"<span class="{}">{}</span>"#,
                mark.class(),
                escape_html(word)
            )),
        }
    }
    out
}

/// Render one matrix cell body: `+added (+pct%) / -removed (-pct%)`.
pub fn matrix_cell_html(added: u64, added_pct: f64, removed: u64, removed_pct: f64) -> String {
    format!(
        "<span style='color:green;'>+{} (+{}%)</span> / <span style='color:red;'>-{} (-{}%)</span>",
        added,
        format_percent(added_pct),
        removed,
        format_percent(removed_pct)
    )
}

/// Render the token diff matrix for one document as a complete HTML page.
pub fn render_matrix_page(title: &str, matrix: &ComparisonMatrix) -> String {
    let title = escape_html(title);
    let mut out = String::new();

    out.push_str("<html>\n");
    out.push_str(&format!(
        "<head><meta charset=\"utf-8\"><title>{title}</title></head>\n"
    ));
    out.push_str("<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));
    out.push_str("<h2>Token Diff Matrix</h2>\n");

    // Headline count comes from the first model in report order.
    let headline_total = matrix.row_totals.first().copied().unwrap_or(0);
    out.push_str(&format!("<p>Total token count: {headline_total}</p>\n"));

    out.push_str("<table border=\"1\">\n");
    out.push_str(&format!(
        "<tr><th>&nbsp;</th><th colspan=\"{}\">Diff With</th></tr>\n",
        matrix.len()
    ));

    out.push_str("<tr><th>Model</th>");
    for model in &matrix.models {
        out.push_str(&format!("<th><tt>{}</tt></th>", escape_html(model)));
    }
    out.push_str("</tr>\n");

    for (model, row) in matrix.models.iter().zip(&matrix.cells) {
        out.push_str(&format!("<tr><th><tt>{}</tt></th>", escape_html(model)));
        for cell in row {
            match cell {
                None => out.push_str("<td>&nbsp;</td>"),
                Some(cell) => out.push_str(&format!(
                    "<td>{}</td>",
                    matrix_cell_html(
                        cell.diff.added,
                        cell.added_pct,
                        cell.diff.removed,
                        cell.removed_pct
                    )
                )),
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}

/// Render the benchmark results page: average similarity per model, then
/// every item with each model's highlighted output.
pub fn render_results_page(
    items: &[BenchmarkItem],
    models: &[String],
    averages: &HashMap<String, Option<f64>>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n");
    out.push_str(&format!(
        "<head><meta charset=\"utf-8\"><title>OCR Benchmark Results</title><style>{STYLE}</style></head>\n"
    ));
    out.push_str("<body>\n<h1>OCR Benchmark Results</h1>\n");
    out.push_str(&format!(
        "<p>{} images, generated {}</p>\n",
        items.len(),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str("<h2>Average Jaccard similarity</h2>\n");
    out.push_str("<table border=\"1\">\n");
    out.push_str("<tr><th>Model</th><th>Average</th></tr>\n");
    for model in models {
        let avg = averages
            .get(model)
            .copied()
            .flatten()
            .map(|a| format!("{a:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "<tr><td><tt>{}</tt></td><td>{}</td></tr>\n",
            escape_html(model),
            avg
        ));
    }
    out.push_str("</table>\n");

    for item in items {
        out.push_str(&render_item(item, models));
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_item(item: &BenchmarkItem, models: &[String]) -> String {
    let mut out = format!(
        "<h2 id=\"item-{id}\">Image {id}: <tt>{}</tt></h2>\n",
        escape_html(&item.file_name),
        id = item.id
    );
    out.push_str(&format!(
        "<p>Format: {} &middot; Quality: {:?}</p>\n",
        escape_html(&item.metadata.format),
        item.metadata.document_quality
    ));
    if let Some(issue) = &item.ground_truth_issue {
        out.push_str(&format!(
            "<p class=\"issue\">Ground truth issue (excluded from averages): {}</p>\n",
            escape_html(issue)
        ));
    }

    out.push_str("<h3>Ground truth</h3>\n");
    out.push_str(&format!(
        "<pre>{}</pre>\n",
        escape_html(&item.true_markdown_output)
    ));

    for model in models {
        let Some(result) = item.model_results.get(model) else {
            continue;
        };
        let flag = if result.is_flagged() {
            " <span class=\"flagged\">(flagged by model)</span>"
        } else {
            ""
        };
        out.push_str(&format!(
            "<h3><tt>{}</tt>: {:.3}{}</h3>\n",
            escape_html(model),
            result.similarity,
            flag
        ));

        if result.missing_pages > 0 {
            out.push_str(&format!(
                "<p class=\"issue\">Missing pages: {}</p>\n",
                result.missing_pages
            ));
        }

        if !result.missing_tokens().is_empty() {
            let missing: Vec<String> = result
                .missing_tokens()
                .iter()
                .map(|t| format!("<span class=\"removed\">{}</span>", escape_html(t)))
                .collect();
            out.push_str(&format!("<p>Missing: {}</p>\n", missing.join(" ")));
        }

        out.push_str(&format!(
            "<pre>{}</pre>\n",
            highlight_html(&result.diff, &result.markdown)
        ));
    }
    out
}
