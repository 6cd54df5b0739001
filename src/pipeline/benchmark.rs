// Ground-truth benchmark: score every model's OCR output against the
// expected Markdown of each benchmark image.
//
// Inputs, all under the benchmark directory:
//   data/test/metadata.jsonl   ground truth, one BenchmarkRecord per line
//   output-MODEL.jsonl         OCR output for MODEL, one OcrOutput per line
//   bad_ground_truth.csv       optional `id,issue` notes on bad ground truth
//
// Outputs: input.csv (work list for the kept images) and results.html.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::io::{jsonl, tables, write_file};
use crate::models::benchmark::{BenchmarkItem, BenchmarkRecord};
use crate::models::ocr_output::OcrOutput;
use crate::output::html;

/// Everything needed to render a benchmark report.
#[derive(Debug)]
pub struct BenchmarkReport {
    pub items: Vec<BenchmarkItem>,
    /// Model names ranked by average similarity, best first.
    pub models: Vec<String>,
    /// Average similarity per model; `None` if no image could be scored.
    pub averages: HashMap<String, Option<f64>>,
}

/// Load, score, and write the benchmark report for the first `limit` images.
pub fn run(config: &Config, limit: usize) -> Result<BenchmarkReport> {
    config.require_benchmark()?;
    let benchmark_dir = &config.benchmark_dir;
    let test_dir = config.benchmark_test_dir();

    let mut items = load_items(&test_dir.join("metadata.jsonl"))?;
    println!("Loaded {} images.", items.len());
    items.truncate(limit);
    println!("Will process {} images.", items.len());

    let mut models = Vec::new();
    for (model_name, path) in discover_model_outputs(benchmark_dir)? {
        let outputs: Vec<OcrOutput> = jsonl::read_records(&path)?;
        if outputs.len() < items.len() {
            warn!(
                model = %model_name,
                outputs = outputs.len(),
                images = items.len(),
                "Model output has fewer images than the benchmark"
            );
        }
        let attached = attach_outputs(&mut items, &model_name, outputs)?;
        println!("Loaded {attached} outputs for model {model_name}.");
        models.push(model_name);
    }

    let issues_path = benchmark_dir.join("bad_ground_truth.csv");
    if issues_path.is_file() {
        let file = File::open(&issues_path)
            .with_context(|| format!("Failed to open {}", issues_path.display()))?;
        let issues = tables::read_ground_truth_issues(file)?;
        apply_ground_truth_issues(&mut items, issues);
    } else {
        info!(path = %issues_path.display(), "No ground truth notes found");
    }

    let averages: HashMap<String, Option<f64>> = models
        .iter()
        .map(|m| (m.clone(), average_similarity(&items, m)))
        .collect();
    for model in &models {
        match averages[model] {
            Some(avg) => info!(model = %model, average = avg, "Average Jaccard score"),
            None => warn!(model = %model, "No scored images for model"),
        }
    }
    let models = rank_models(models, &averages);

    let rows: Vec<(String, String)> = items
        .iter()
        .map(|item| {
            (
                item.id.to_string(),
                item.path(&test_dir).display().to_string(),
            )
        })
        .collect();
    tables::write_input_csv(&benchmark_dir.join("input.csv"), &rows)?;

    let page = html::render_results_page(&items, &models, &averages, Utc::now());
    write_file(&benchmark_dir.join("results.html"), &page)?;

    Ok(BenchmarkReport {
        items,
        models,
        averages,
    })
}

/// Read and decode every benchmark record.
pub fn load_items(metadata_path: &Path) -> Result<Vec<BenchmarkItem>> {
    let records: Vec<BenchmarkRecord> = jsonl::read_records(metadata_path)?;
    records
        .into_iter()
        .map(|r| {
            r.decode()
                .with_context(|| format!("Invalid record in {}", metadata_path.display()))
        })
        .collect()
}

/// Find `output-MODEL.jsonl` files, returning (model, path) sorted by model.
pub fn discover_model_outputs(benchmark_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(benchmark_dir)
        .with_context(|| format!("Failed to read directory {}", benchmark_dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(model) = name
            .strip_prefix("output-")
            .and_then(|rest| rest.strip_suffix(".jsonl"))
        {
            if !model.is_empty() && path.is_file() {
                found.push((model.to_string(), path.clone()));
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Attach each output to the image at position `id`. Outputs for images
/// beyond the processed range are skipped. Returns how many were attached.
pub fn attach_outputs(
    items: &mut [BenchmarkItem],
    model_name: &str,
    outputs: Vec<OcrOutput>,
) -> Result<usize> {
    let mut attached = 0;
    for output in outputs {
        let idx = output.numeric_id()? as usize;
        let Some(item) = items.get_mut(idx) else {
            debug!(model = model_name, id = idx, "Output beyond processed images, skipping");
            continue;
        };
        item.add_model_result(model_name, output)?;
        attached += 1;
    }
    Ok(attached)
}

/// Record ground-truth issues on the matching images. Ids outside the
/// processed range are logged and ignored.
pub fn apply_ground_truth_issues(items: &mut [BenchmarkItem], issues: Vec<(u64, String)>) {
    for (id, issue) in issues {
        match items.get_mut(id as usize) {
            Some(item) => item.ground_truth_issue = Some(issue),
            None => warn!(id, "Ground truth note for an image that is not being processed"),
        }
    }
}

/// Mean similarity of `model` over images without a ground-truth issue.
pub fn average_similarity(items: &[BenchmarkItem], model: &str) -> Option<f64> {
    let scores: Vec<f64> = items
        .iter()
        .filter(|item| item.ground_truth_issue.is_none())
        .filter_map(|item| item.model_results.get(model))
        .map(|r| r.similarity)
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Sort models by average, best first. Models without an average go last;
/// ties keep their incoming order.
pub fn rank_models(mut models: Vec<String>, averages: &HashMap<String, Option<f64>>) -> Vec<String> {
    models.sort_by(|a, b| {
        let avg_a = averages.get(a).copied().flatten();
        let avg_b = averages.get(b).copied().flatten();
        match (avg_a, avg_b) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_models() {
        let averages: HashMap<String, Option<f64>> = [
            ("a".to_string(), Some(0.5)),
            ("b".to_string(), None),
            ("c".to_string(), Some(0.9)),
            ("d".to_string(), Some(0.5)),
        ]
        .into();
        let ranked = rank_models(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            &averages,
        );
        assert_eq!(ranked, vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_discover_model_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["output-gpt.jsonl", "output-.jsonl", "output.x.jsonl", "output-a.jsonl"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let found = discover_model_outputs(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(names, vec!["a", "gpt"]);
    }
}
