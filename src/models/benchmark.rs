// Ground-truth benchmark items and per-model results.
//
// The benchmark's metadata.jsonl stores two fields as JSON encoded *inside* a
// string: `metadata` (an object) and `true_markdown_output` (a string). We
// read the outer record as-is into `BenchmarkRecord`, then `decode` it into a
// `BenchmarkItem`, failing loudly if either nested payload is malformed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ocr_output::OcrOutput;
use crate::tokens::{jaccard, TokenCounts, TokenDiff};

/// Document quality buckets used by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentQuality {
    Clean,
    Photo,
    HighQuality,
    LowQuality,
}

/// Decoded contents of the `metadata` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BenchmarkMetadata {
    /// Document format, e.g. "CHART" or "PATENT".
    pub format: String,
    pub document_quality: DocumentQuality,
    #[serde(default)]
    pub font_family: Option<String>,
    /// Rotation in degrees, if the image is rotated.
    #[serde(default)]
    pub rotation: Option<i32>,
}

/// A metadata.jsonl line exactly as stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkRecord {
    pub id: u64,
    /// JSON-encoded `BenchmarkMetadata`.
    pub metadata: String,
    pub json_schema: String,
    pub true_json_output: String,
    /// JSON-encoded string holding the expected Markdown.
    pub true_markdown_output: String,
    pub file_name: String,
    #[serde(default)]
    pub ground_truth_issue: Option<String>,
}

impl BenchmarkRecord {
    /// Decode the nested JSON fields.
    pub fn decode(self) -> Result<BenchmarkItem> {
        let metadata: BenchmarkMetadata = serde_json::from_str(&self.metadata)
            .with_context(|| format!("Invalid nested JSON in metadata of item {}", self.id))?;
        let true_markdown_output: String = serde_json::from_str(&self.true_markdown_output)
            .with_context(|| {
                format!(
                    "true_markdown_output of item {} is not a JSON-encoded string",
                    self.id
                )
            })?;

        Ok(BenchmarkItem {
            id: self.id,
            metadata,
            json_schema: self.json_schema,
            true_json_output: self.true_json_output,
            true_markdown_output,
            file_name: self.file_name,
            ground_truth_issue: self.ground_truth_issue,
            model_results: BTreeMap::new(),
        })
    }
}

/// A benchmark image with its ground truth and any attached model results.
#[derive(Debug, Clone)]
pub struct BenchmarkItem {
    pub id: u64,
    pub metadata: BenchmarkMetadata,
    /// JSON schema for structured extraction (kept verbatim).
    pub json_schema: String,
    /// Expected structured output (kept verbatim).
    pub true_json_output: String,
    pub true_markdown_output: String,
    pub file_name: String,
    /// Known problem with the ground truth. Items with an issue are shown in
    /// reports but excluded from averages.
    pub ground_truth_issue: Option<String>,
    pub model_results: BTreeMap<String, ModelResult>,
}

impl BenchmarkItem {
    /// Path to the image file, relative to the benchmark's test data dir.
    pub fn path(&self, test_data_dir: &Path) -> PathBuf {
        test_data_dir.join(&self.file_name)
    }

    /// Score `output` against the ground truth and store it under `model_name`.
    ///
    /// The output must belong to this item: an id mismatch means the output
    /// file and the benchmark are out of sync, and is an error.
    pub fn add_model_result(&mut self, model_name: &str, output: OcrOutput) -> Result<()> {
        let output_id = output.numeric_id()?;
        if output_id != self.id {
            anyhow::bail!(
                "Model output ID {} does not match image ID {} (model {})",
                output_id,
                self.id,
                model_name
            );
        }

        let result = ModelResult::score(&self.true_markdown_output, output);
        self.model_results.insert(model_name.to_string(), result);
        Ok(())
    }
}

/// The result of running one model on one benchmark item.
#[derive(Debug, Clone)]
pub struct ModelResult {
    pub output: OcrOutput,
    /// Jaccard similarity of the extracted text against the ground truth.
    pub similarity: f64,
    /// Extracted Markdown, with failed pages shown as a missing-page heading.
    pub markdown: String,
    /// Pages the engine could not OCR.
    pub missing_pages: usize,
    /// The full diff against the ground truth.
    pub diff: TokenDiff,
}

impl ModelResult {
    /// Compare OCR output to the expected Markdown.
    pub fn score(expected_markdown: &str, output: OcrOutput) -> Self {
        let expected = TokenCounts::from_text(expected_markdown);
        let document = output.document();
        let extracted = TokenCounts::from_document(&document);

        let similarity = jaccard(&expected, &extracted);
        let diff = TokenDiff::between(&expected, &extracted);

        Self {
            output,
            similarity,
            markdown: document.to_markdown(),
            missing_pages: document.missing_page_count(),
            diff,
        }
    }

    /// Ground-truth tokens the model never produced.
    pub fn missing_tokens(&self) -> &BTreeSet<String> {
        &self.diff.removed
    }

    /// True if the model itself reported defects in the image.
    pub fn is_flagged(&self) -> bool {
        self.output.is_flagged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(markdown: &str) -> String {
        serde_json::json!({
            "id": 4,
            "metadata": r#"{"format":"RECEIPT","documentQuality":"PHOTO","rotation":90}"#,
            "json_schema": "{}",
            "true_json_output": "{}",
            "true_markdown_output": serde_json::to_string(markdown).unwrap(),
            "file_name": "4.png",
        })
        .to_string()
    }

    fn output(id: serde_json::Value, text: &str) -> OcrOutput {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "path": "4.png",
            "status": "ok",
            "text": text,
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_nested_fields() {
        let record: BenchmarkRecord = serde_json::from_str(&record_json("# Total\n\n5")).unwrap();
        let item = record.decode().unwrap();
        assert_eq!(item.metadata.document_quality, DocumentQuality::Photo);
        assert_eq!(item.metadata.rotation, Some(90));
        assert_eq!(item.metadata.font_family, None);
        assert_eq!(item.true_markdown_output, "# Total\n\n5");
    }

    #[test]
    fn test_decode_rejects_malformed_metadata() {
        let mut value: serde_json::Value = serde_json::from_str(&record_json("x")).unwrap();
        value["metadata"] = serde_json::Value::String("{not json".to_string());
        let record: BenchmarkRecord = serde_json::from_value(value).unwrap();
        assert!(record.decode().is_err());
    }

    #[test]
    fn test_decode_rejects_unencoded_markdown() {
        let mut value: serde_json::Value = serde_json::from_str(&record_json("x")).unwrap();
        value["true_markdown_output"] = serde_json::Value::String("plain text".to_string());
        let record: BenchmarkRecord = serde_json::from_value(value).unwrap();
        assert!(record.decode().is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let mut value: serde_json::Value = serde_json::from_str(&record_json("x")).unwrap();
        value["surprise"] = serde_json::Value::Bool(true);
        assert!(serde_json::from_value::<BenchmarkRecord>(value).is_err());
    }

    #[test]
    fn test_add_model_result_scores_output() {
        let record: BenchmarkRecord =
            serde_json::from_str(&record_json("Total due 5 5")).unwrap();
        let mut item = record.decode().unwrap();
        item.add_model_result("tesseract", output(serde_json::json!("4"), "Total 5 tip"))
            .unwrap();

        let result = &item.model_results["tesseract"];
        // min: total 1 + 5 1 = 2. max: total 1 + due 1 + 5 2 + tip 1 = 5.
        assert!((result.similarity - 0.4).abs() < 1e-9);
        assert!(result.missing_tokens().contains("due"));
        assert_eq!(
            result.diff.highlight_markdown(&result.markdown),
            r#"Total <span class="changed">5</span> <span class="added">tip</span>"#
        );
        assert_eq!(result.missing_pages, 0);
    }

    #[test]
    fn test_failed_pages_do_not_score_as_text() {
        let record: BenchmarkRecord = serde_json::from_str(&record_json("Total due")).unwrap();
        let mut item = record.decode().unwrap();
        item.add_model_result(
            "gemini",
            output(
                serde_json::json!(4),
                "Total due\n\n**COULD_NOT_OCR_PAGE**",
            ),
        )
        .unwrap();

        let result = &item.model_results["gemini"];
        assert_eq!(result.similarity, 1.0);
        assert!(result.diff.is_empty());
        assert_eq!(result.missing_pages, 1);
        assert_eq!(result.markdown, "Total due\n\n## (MISSING PAGE)");
    }

    #[test]
    fn test_add_model_result_id_mismatch_is_error() {
        let record: BenchmarkRecord = serde_json::from_str(&record_json("x")).unwrap();
        let mut item = record.decode().unwrap();
        let err = item
            .add_model_result("m", output(serde_json::json!(5), "x"))
            .unwrap_err();
        assert!(err.to_string().contains("does not match"));
        assert!(item.model_results.is_empty());
    }
}
