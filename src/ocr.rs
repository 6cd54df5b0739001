// OCR engine trait: the boundary to the external OCR tool.
//
// The benchmark never does OCR itself. It hands an `id,path` CSV to an
// external tool and reads back a JSONL file of `OcrOutput` records. The
// default implementation shells out to that tool once per model; the
// `ExistingOutput` engine reuses results from an earlier run.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::config::ModelInfo;

/// Runs OCR for one model over a work list.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// OCR every row of `input_csv` with `model`, writing `output_jsonl`.
    /// Both file names are relative to `data_dir`.
    async fn run(
        &self,
        model: &ModelInfo,
        data_dir: &Path,
        input_csv: &str,
        output_jsonl: &str,
    ) -> Result<()>;
}

/// Invokes the OCR command-line tool as a subprocess.
pub struct CommandOcrEngine {
    /// Executable name or path.
    pub command: String,
}

impl CommandOcrEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Arguments for one run. Failures are tolerated at any rate, since some
    /// engines can't read some input formats at all.
    pub fn args(model: &ModelInfo, input_csv: &str, output_jsonl: &str) -> Vec<String> {
        let mut args = vec![
            "ocr".to_string(),
            "--allowed-failure-rate".to_string(),
            "1.0".to_string(),
        ];
        args.extend(model.options());
        args.extend([
            "--out".to_string(),
            output_jsonl.to_string(),
            input_csv.to_string(),
        ]);
        args
    }
}

#[async_trait]
impl OcrEngine for CommandOcrEngine {
    async fn run(
        &self,
        model: &ModelInfo,
        data_dir: &Path,
        input_csv: &str,
        output_jsonl: &str,
    ) -> Result<()> {
        let args = Self::args(model, input_csv, output_jsonl);
        info!(command = %self.command, model = %model.name, ?args, "Running OCR");

        let status = Command::new(&self.command)
            .args(&args)
            .current_dir(data_dir)
            .status()
            .await
            .with_context(|| format!("Failed to start OCR command {:?}", self.command))?;

        if !status.success() {
            anyhow::bail!("OCR command for model {} failed with {}", model.name, status);
        }
        Ok(())
    }
}

/// Uses outputs already on disk instead of running OCR.
pub struct ExistingOutput;

#[async_trait]
impl OcrEngine for ExistingOutput {
    async fn run(
        &self,
        model: &ModelInfo,
        data_dir: &Path,
        _input_csv: &str,
        output_jsonl: &str,
    ) -> Result<()> {
        let path = data_dir.join(output_jsonl);
        if !path.is_file() {
            anyhow::bail!(
                "No existing OCR output for model {} at {}. Run without --skip-ocr first.",
                model.name,
                path.display()
            );
        }
        Ok(())
    }
}
