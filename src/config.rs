use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// One OCR model to run and compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model name as understood by the OCR tool's `--model` flag.
    pub name: String,
    /// Rasterize PDFs before OCR (for engines that only read images).
    pub rasterize: bool,
    /// How many jobs the OCR tool may run in parallel for this model.
    pub job_count: usize,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, rasterize: bool, job_count: usize) -> Self {
        Self {
            name: name.into(),
            rasterize,
            job_count,
        }
    }

    /// Parse `name[:rasterize][:jobs=N]`, e.g. `tesseract:rasterize:jobs=4`.
    pub fn parse(spec: &str, default_jobs: usize) -> Result<Self> {
        let mut parts = spec.trim().split(':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            anyhow::bail!("Empty model name in model spec {spec:?}");
        }

        let mut model = Self::new(name, false, default_jobs);
        for option in parts {
            match option.trim() {
                "rasterize" => model.rasterize = true,
                opt => match opt.strip_prefix("jobs=") {
                    Some(n) => {
                        model.job_count = n.parse().map_err(|_| {
                            anyhow::anyhow!("Invalid job count {n:?} in model spec {spec:?}")
                        })?;
                    }
                    None => anyhow::bail!("Unknown option {opt:?} in model spec {spec:?}"),
                },
            }
        }
        Ok(model)
    }

    /// Command-line options passed to the OCR tool for this model.
    pub fn options(&self) -> Vec<String> {
        let mut opts = vec![
            "--model".to_string(),
            self.name.clone(),
            "--jobs".to_string(),
            self.job_count.to_string(),
        ];
        if self.rasterize {
            opts.push("--rasterize".to_string());
        }
        opts
    }

    /// Per-model output file name: `{filename}.{model}.{ext}`.
    pub fn build_path(&self, filename: &str, ext: &str) -> String {
        format!("{filename}.{}.{ext}", self.name)
    }
}

/// Parse a comma-separated list of model specs.
pub fn parse_model_list(list: &str, default_jobs: usize) -> Result<Vec<ModelInfo>> {
    let models = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| ModelInfo::parse(s, default_jobs))
        .collect::<Result<Vec<_>>>()?;
    if models.is_empty() {
        anyhow::bail!("Model list {list:?} does not name any models");
    }
    Ok(models)
}

/// Number of CPU cores, falling back to 8 when it can't be determined.
pub fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(8)
}

/// The models compared when nothing else is configured.
pub fn default_models() -> Vec<ModelInfo> {
    let cpus = cpu_count();
    vec![
        ModelInfo::new("gemini-2.0-flash", false, 30),
        // Textract allows at most 10 requests per second.
        ModelInfo::new("textract", false, 8),
        ModelInfo::new("tesseract", true, cpus),
        ModelInfo::new("pdftotext", false, cpus),
    ]
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Executable of the external OCR tool.
    pub ocr_command: String,
    /// Root of the OCR benchmark checkout.
    pub benchmark_dir: PathBuf,
    /// Models to run, in report order.
    pub models: Vec<ModelInfo>,
}

impl Config {
    /// Load configuration from environment variables. Every value has a default.
    pub fn load() -> Result<Self> {
        let models = match env::var("OCRBENCH_MODELS") {
            Ok(list) if !list.trim().is_empty() => parse_model_list(&list, cpu_count())?,
            _ => default_models(),
        };

        Ok(Self {
            ocr_command: env::var("OCRBENCH_OCR_COMMAND")
                .unwrap_or_else(|_| "prompt-scaler".to_string()),
            benchmark_dir: env::var("OCRBENCH_BENCHMARK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("benchmarks/ocr")),
            models,
        })
    }

    /// Replace the configured models with ones given on the command line.
    pub fn override_models(&mut self, specs: &[String]) -> Result<()> {
        if specs.is_empty() {
            return Ok(());
        }
        self.models = specs
            .iter()
            .map(|s| ModelInfo::parse(s, cpu_count()))
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// Directory holding the benchmark's test images and metadata.jsonl.
    pub fn benchmark_test_dir(&self) -> PathBuf {
        self.benchmark_dir.join("data").join("test")
    }

    /// Check that the benchmark checkout is present.
    pub fn require_benchmark(&self) -> Result<()> {
        let test_dir = self.benchmark_test_dir();
        if !test_dir.is_dir() {
            anyhow::bail!(
                "Benchmark directory {} does not exist.\n\
                 Check out the benchmark repository with `git submodule update --init` \
                 (requires `git lfs`), or set OCRBENCH_BENCHMARK_DIR.",
                test_dir.display()
            );
        }
        Ok(())
    }
}
