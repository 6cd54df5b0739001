// Cross-model comparison over a directory of scanned documents.
//
// Every image and PDF under the data directory is OCRed by each configured
// model. For each (model, document) we write the extracted Markdown and a
// token table next to the input, and for each document we write an HTML
// matrix showing how much every pair of models disagrees.
//
// Layout for an input `scans/a.pdf` and a model `tesseract`:
//
//   input.csv                      work list for the OCR tool
//   output.tesseract.jsonl         raw OCR records
//   scans/a.pdf.tesseract.md       extracted Markdown
//   scans/a.pdf.tesseract.tokens.csv
//   scans/a.pdf.html               comparison matrix

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::ModelInfo;
use crate::io::{jsonl, tables, write_file};
use crate::matrix::ComparisonMatrix;
use crate::models::ocr_output::OcrOutput;
use crate::ocr::OcrEngine;
use crate::output::{html, terminal};
use crate::tokens::TokenCounts;

/// Extensions we know how to OCR.
pub const INPUT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "webp", "gif"];

/// Extensions of files this pipeline writes; skipped silently on later runs.
pub const OUTPUT_EXTENSIONS: &[&str] = &["csv", "jsonl", "md", "html"];

/// Name of the work list written into the data directory.
pub const INPUT_CSV: &str = "input.csv";

/// Counts of what a comparison run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareSummary {
    /// Input files found in the data directory.
    pub inputs: usize,
    /// Documents that got a comparison matrix.
    pub documents: usize,
}

/// Run every model over `data_dir` and write the per-document reports.
pub async fn run(
    data_dir: &Path,
    models: &[ModelInfo],
    engine: &dyn OcrEngine,
) -> Result<CompareSummary> {
    if !data_dir.is_dir() {
        anyhow::bail!("Data directory {} does not exist.", data_dir.display());
    }

    let inputs = collect_inputs(data_dir)?;
    let rows: Vec<(String, String)> = inputs.iter().map(|p| (p.clone(), p.clone())).collect();
    tables::write_input_csv(&data_dir.join(INPUT_CSV), &rows)?;
    info!(count = inputs.len(), "Wrote OCR work list");

    // model -> document -> counts
    let mut model_doc_counts: Vec<(String, HashMap<String, TokenCounts>)> = Vec::new();

    for model in models {
        println!("Running {}...", model.name);
        let output_name = model.build_path("output", "jsonl");
        engine.run(model, data_dir, INPUT_CSV, &output_name).await?;

        let records: Vec<OcrOutput> = jsonl::read_records(&data_dir.join(&output_name))?;
        let doc_counts = write_model_outputs(data_dir, model, &records)?;
        info!(model = %model.name, documents = doc_counts.len(), "Loaded OCR output");
        model_doc_counts.push((model.name.clone(), doc_counts));
    }

    // Pivot to document -> model -> counts.
    let mut doc_model_counts: BTreeMap<String, HashMap<String, TokenCounts>> = BTreeMap::new();
    for (model_name, doc_counts) in model_doc_counts {
        for (doc, counts) in doc_counts {
            doc_model_counts
                .entry(doc)
                .or_default()
                .insert(model_name.clone(), counts);
        }
    }

    let model_order: Vec<String> = models.iter().map(|m| m.name.clone()).collect();

    let pb = ProgressBar::new(doc_model_counts.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("  Matrices [{bar:30}] {pos}/{len}")?);

    let mut documents = 0;
    for (doc, counts) in &doc_model_counts {
        let order = models_with_output(&model_order, counts);
        if order.len() < model_order.len() {
            warn!(
                document = %doc,
                present = order.len(),
                expected = model_order.len(),
                "Some models produced no record for this document"
            );
        }

        let matrix = ComparisonMatrix::build(&order, counts)?;
        let html_path = data_dir.join(format!("{doc}.html"));
        write_file(
            &html_path,
            &html::render_matrix_page(&html_path.display().to_string(), &matrix),
        )?;
        pb.suspend(|| terminal::display_matrix_summary(doc, &matrix));
        documents += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(CompareSummary {
        inputs: inputs.len(),
        documents,
    })
}

/// Keep the models from `order` that have counts for this document, in order.
pub fn models_with_output(order: &[String], counts: &HashMap<String, TokenCounts>) -> Vec<String> {
    order
        .iter()
        .filter(|m| counts.contains_key(*m))
        .cloned()
        .collect()
}

/// Write the Markdown and token table for each record, returning each
/// document's token counts.
pub fn write_model_outputs(
    data_dir: &Path,
    model: &ModelInfo,
    records: &[OcrOutput],
) -> Result<HashMap<String, TokenCounts>> {
    let mut doc_counts = HashMap::new();
    for record in records {
        let rel_path = record.id_string();
        let document = record.document();

        let md_path = data_dir.join(model.build_path(&rel_path, "md"));
        write_file(&md_path, &document.to_markdown())?;

        let counts = TokenCounts::from_document(&document);
        let tokens_path = data_dir.join(model.build_path(&rel_path, "tokens.csv"));
        tables::write_token_table_file(&tokens_path, &counts)?;

        doc_counts.insert(rel_path, counts);
    }
    Ok(doc_counts)
}

/// Find every OCR-able file under `data_dir`, as `/`-separated relative paths
/// in sorted order.
pub fn collect_inputs(data_dir: &Path) -> Result<Vec<String>> {
    let mut found = Vec::new();
    walk(data_dir, data_dir, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(root: &Path, dir: &Path, found: &mut Vec<String>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        // file_type() does not follow symlinks. Linked directories are skipped.
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(root, &path, found)?;
            continue;
        }
        if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "Skipping symlinked directory");
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let rel_path = path
            .strip_prefix(root)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if OUTPUT_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }
        if !INPUT_EXTENSIONS.contains(&ext.as_str()) {
            warn!(path = %rel_path, "Skipping file with unknown extension");
            continue;
        }
        found.push(rel_path);
    }
    Ok(())
}
