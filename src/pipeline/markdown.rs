// Export OCR output records as one Markdown file per document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::io::{jsonl, write_file};
use crate::models::ocr_output::OcrOutput;

/// Write `OUTPUT_DIR/<id without extension>.md` for every record in
/// `input_jsonl`. Returns the number of files written.
pub fn export(input_jsonl: &Path, output_dir: &Path) -> Result<usize> {
    if !input_jsonl.is_file() {
        anyhow::bail!("Input file {} does not exist.", input_jsonl.display());
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

    let records: Vec<OcrOutput> = jsonl::read_records(input_jsonl)?;
    for record in &records {
        let path = markdown_path(output_dir, &record.id_string());
        let mut text = record.document().to_markdown();
        text.push_str("\n\n");
        write_file(&path, &text)?;
    }

    info!(count = records.len(), dir = %output_dir.display(), "Wrote Markdown files");
    Ok(records.len())
}

/// Output path for a document id: its final extension is dropped and `.md`
/// appended, keeping any directories in the id.
pub fn markdown_path(output_dir: &Path, id: &str) -> PathBuf {
    let stem = Path::new(id).with_extension("");
    let mut path = output_dir.join(stem).into_os_string();
    path.push(".md");
    PathBuf::from(path)
}
