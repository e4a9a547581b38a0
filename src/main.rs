use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use textbook_corpus::data::{load_tokens_from_dir, render_report};
use textbook_corpus::pipeline::{process_raw_text, BoundaryOutcome};
use textbook_corpus::{CorpusConfig, Pipeline, PipelineError, TesseractRecognizer};

#[derive(Debug, Parser)]
#[command(author, version, about = "Build a script-filtered text corpus from textbook PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract, normalize and segment every PDF under a directory
    Build(BuildArgs),
    /// Normalize and segment an already-extracted raw text file
    Normalize(NormalizeArgs),
    /// Write an n-gram frequency report over a directory of corpus files
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Directory of PDFs, one subdirectory per category
    #[arg(short, long)]
    input: PathBuf,
    /// Directory receiving one `<category>_<stem>.txt` per document
    #[arg(short, long)]
    output: PathBuf,
    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker threads (defaults to one per core)
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// Raw text file
    #[arg(short, long)]
    input: PathBuf,
    /// Corpus file to write
    #[arg(short, long)]
    output: PathBuf,
    /// Path to configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Document name used to look up boundary markers (defaults to the file stem)
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Directory of corpus `.txt` files
    #[arg(short, long)]
    input: PathBuf,
    /// Report file to write
    #[arg(short, long)]
    output: PathBuf,
    /// Rows per table
    #[arg(long, default_value_t = 50)]
    top: usize,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => build_command(args),
        Commands::Normalize(args) => normalize_command(args),
        Commands::Report(args) => report_command(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<CorpusConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            CorpusConfig::load(path)
        }
        None => Ok(CorpusConfig::default()),
    }
}

fn build_command(args: BuildArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    info!("Configuration: {}", config);

    let recognizer =
        TesseractRecognizer::new(Duration::from_secs(config.extraction.ocr_timeout_secs));
    if !recognizer.is_available() {
        warn!("tesseract not found in PATH, sparse pages will keep their text layer");
    }

    let pipeline = Pipeline::new(&config, &recognizer);
    let summary = pipeline.process_directory(&args.input, &args.output, args.jobs)?;

    info!("Corpus build complete!");
    info!("Summary:");
    info!("  - Documents found: {}", summary.discovered);
    info!("  - Documents processed: {}", summary.processed);
    info!("  - Documents failed: {}", summary.failed);
    info!("  - Documents with no sentences: {}", summary.empty);
    info!("  - Pages recognised with OCR: {}", summary.ocr_pages);
    info!("  - Sentences written: {}", summary.sentences);

    Ok(())
}

fn normalize_command(args: NormalizeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    info!("Reading from: {:?}", args.input);
    let raw = fs::read_to_string(&args.input)
        .map_err(|e| PipelineError::io(&args.input, e))
        .with_context(|| format!("Failed to read raw text: {:?}", args.input))?;

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    let name = args.name.unwrap_or_else(|| stem.clone());

    let (corpus, boundary) = process_raw_text(&config, &raw, &[name.as_str(), stem.as_str()]);

    if boundary == BoundaryOutcome::Trimmed {
        info!("Extracted core content between boundary markers");
    }

    corpus.write_to(&args.output)?;

    if corpus.is_empty() {
        warn!("No sentences survived filtering, wrote empty {:?}", args.output);
    }
    info!("Saved {} processed sentences to {:?}", corpus.len(), args.output);

    Ok(())
}

fn report_command(args: ReportArgs) -> Result<()> {
    let tokens = load_tokens_from_dir(&args.input)?;
    info!("Loaded {} tokens", tokens.len());

    let dataset = fs::canonicalize(&args.input).unwrap_or_else(|_| args.input.clone());
    let report = render_report(&tokens, args.top, &dataset);

    fs::write(&args.output, report)
        .map_err(|e| PipelineError::io(&args.output, e))
        .with_context(|| format!("Failed to write report: {:?}", args.output))?;

    info!("Analysis complete. Report saved to {:?}", args.output);
    Ok(())
}
