// OCR output records: one JSON object per line, as written by the OCR tool.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, Page};

/// Processing status of one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    Ok,
    Incomplete,
    Failed,
}

/// Where the image came from, as judged by the OCR model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageSource {
    PhotoOrVideo,
    Scan,
    Digital,
}

/// Defects in the page that make it difficult to OCR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OcrAnalysis {
    pub background_is_noisy: bool,
    pub contains_blurred_text: bool,
    pub contains_cutoff_text: bool,
    pub contains_distorted_text: bool,
    pub contains_faint_text: bool,
    pub contains_handwriting: bool,
    pub contains_unreadable_or_ambiguous_text: bool,
    pub glare_on_some_text: bool,
    pub image_source: ImageSource,
}

impl OcrAnalysis {
    /// True if the model reported any defect that casts doubt on its text.
    ///
    /// A noisy background alone is not enough: most photos have one.
    pub fn has_text_defects(&self) -> bool {
        self.contains_blurred_text
            || self.contains_cutoff_text
            || self.contains_distorted_text
            || self.contains_faint_text
            || self.contains_handwriting
            || self.contains_unreadable_or_ambiguous_text
            || self.glare_on_some_text
    }
}

/// LLM token usage reported by the OCR tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub completion_tokens: u64,
    pub prompt_tokens: u64,
}

/// One OCR result record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// The work item id. Any JSON scalar; usually a string path or an integer.
    pub id: Value,
    /// The input path.
    pub path: String,
    pub status: WorkStatus,
    /// Combined extracted text. Failed pages appear as `**COULD_NOT_OCR_PAGE**`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Per-page text; `null` entries are pages the engine failed on.
    #[serde(
        default,
        alias = "extracted_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pages: Option<Vec<Page>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<OcrAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl OcrOutput {
    /// The id as display text: strings without quotes, everything else as JSON.
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The id as an integer, accepting both `7` and `"7"`.
    pub fn numeric_id(&self) -> Result<u64> {
        match &self.id {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| anyhow::anyhow!("OCR output id {n} is not a non-negative integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("OCR output id {s:?} is not an integer")),
            other => anyhow::bail!("OCR output id {other} is not an integer"),
        }
    }

    /// The extracted document. Prefers per-page output; falls back to the
    /// combined text, whose failed-page placeholders become missing pages,
    /// and to an empty document if neither was produced.
    pub fn document(&self) -> Document {
        if let Some(pages) = &self.pages {
            Document::new(pages.clone())
        } else if let Some(text) = &self.text {
            Document::from_combined_text(text)
        } else {
            Document::default()
        }
    }

    /// True if the engine's own analysis flagged defects in the image.
    pub fn is_flagged(&self) -> bool {
        self.analysis.as_ref().is_some_and(OcrAnalysis::has_text_defects)
    }
}
