use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use ocrbench::config::Config;
use ocrbench::io::{open_input, open_output, tables};
use ocrbench::ocr::{CommandOcrEngine, ExistingOutput, OcrEngine};
use ocrbench::output::terminal;
use ocrbench::pipeline::{benchmark, columns, compare_models, export_key, markdown};
use ocrbench::tokens::TokenCounts;

/// ocrbench: compare OCR engines against ground truth and each other.
///
/// Text is compared as bags of lowercase word tokens, ignoring order, so the
/// scores measure whether the words came out right rather than the layout.
#[derive(Parser)]
#[command(name = "ocrbench", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR every document in a directory with each model and write
    /// per-document comparison matrices
    CompareModels {
        /// Directory of PDFs and images
        data_dir: PathBuf,

        /// Reuse existing output.MODEL.jsonl files instead of running OCR
        #[arg(long)]
        skip_ocr: bool,

        /// Model to run, as name[:rasterize][:jobs=N] (repeatable; overrides OCRBENCH_MODELS)
        #[arg(long = "model")]
        models: Vec<String>,
    },

    /// Score model outputs against the benchmark's ground truth
    Benchmark {
        /// Number of images to process (default: 100)
        #[arg(long, default_value = "100")]
        images: usize,

        /// Show this many lowest-scoring images per model (default: 0)
        #[arg(long, default_value = "0")]
        worst: usize,
    },

    /// Add a Jaccard similarity column comparing text files named in two CSV columns
    CompareColumns {
        /// Input CSV (default: standard input)
        input: Option<PathBuf>,

        /// Output CSV (default: standard output)
        #[arg(long)]
        out: Option<PathBuf>,

        /// First column holding a text file path
        #[arg(long)]
        column1: String,

        /// Second column holding a text file path
        #[arg(long)]
        column2: String,
    },

    /// Write each OCR record in a JSONL file as a Markdown file
    ToMarkdown {
        /// OCR output JSONL
        input: PathBuf,

        /// Directory to write Markdown files into
        output_dir: PathBuf,
    },

    /// Move a JSONL field into one file per record
    ExportKey {
        /// Input JSONL (default: standard input)
        input: Option<PathBuf>,

        /// Output JSONL (default: standard output)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Field to export
        #[arg(long)]
        key: String,

        /// Field to add with the written file's path
        #[arg(long)]
        new_key: String,

        /// Output path pattern; "{id}" is replaced by the record id
        #[arg(long)]
        path_pattern: String,
    },

    /// Print the token table for a text file
    Tokens {
        /// Text or Markdown file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so filter commands can write CSV/JSONL to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ocrbench=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CompareModels {
            data_dir,
            skip_ocr,
            models,
        } => {
            let mut config = Config::load()?;
            config.override_models(&models)?;
            info!(cpus = ocrbench::config::cpu_count(), "Detected CPU cores");

            let engine: Box<dyn OcrEngine> = if skip_ocr {
                Box::new(ExistingOutput)
            } else {
                Box::new(CommandOcrEngine::new(&config.ocr_command))
            };

            let summary =
                compare_models::run(&data_dir, &config.models, engine.as_ref()).await?;

            println!("\n{}", "Comparison complete.".bold());
            println!("  Input files: {}", summary.inputs);
            println!("  Matrices written: {}", summary.documents);
        }

        Commands::Benchmark { images, worst } => {
            let config = Config::load()?;
            let report = benchmark::run(&config, images)?;

            terminal::display_averages(&report.models, &report.averages);
            if worst > 0 {
                for model in &report.models {
                    terminal::display_worst_items(model, &report.items, worst);
                }
            }
            println!(
                "Results written to {}",
                config.benchmark_dir.join("results.html").display()
            );
        }

        Commands::CompareColumns {
            input,
            out,
            column1,
            column2,
        } => {
            let reader = open_input(input.as_deref())?;
            let writer = open_output(out.as_deref())?;
            columns::compare_columns(reader, writer, &column1, &column2)?;
        }

        Commands::ToMarkdown { input, output_dir } => {
            let count = markdown::export(&input, &output_dir)?;
            println!("Wrote {count} Markdown files to {}", output_dir.display());
        }

        Commands::ExportKey {
            input,
            out,
            key,
            new_key,
            path_pattern,
        } => {
            let options = export_key::ExportKeyOptions {
                key,
                new_key,
                path_pattern,
            };
            let reader = open_input(input.as_deref())?;
            let writer = open_output(out.as_deref())?;
            export_key::export_key(reader, writer, &options)?;
        }

        Commands::Tokens { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let counts = TokenCounts::from_text(&text);
            tables::write_token_table(std::io::stdout().lock(), &counts)?;
        }
    }

    Ok(())
}
