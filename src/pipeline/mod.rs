mod assembler;
mod extractor;
mod normalizer;
mod segmenter;
mod validator;

pub use assembler::assemble;
pub use extractor::PageExtractor;
pub use normalizer::{BoundaryOutcome, NormalizedText, Normalizer};
pub use segmenter::Segmenter;
pub use validator::TokenValidator;

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info, info_span, warn};
use walkdir::WalkDir;

use crate::config::CorpusConfig;
use crate::data::{Corpus, PageSource};
use crate::error::PipelineError;
use crate::utils::{PdfDocument, Recognizer};

/// A source file and the corpus name derived from its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Folders below the root and the file stem joined by `_`,
    /// e.g. `class11_biology` for `<root>/class11/biology.pdf`.
    pub name: String,
}

impl SourceFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let relative = path.strip_prefix(root).unwrap_or(path.as_path());
        let mut parts: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(|parent| parent.components())
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        parts.push(stem);
        let name = parts.join("_");

        Self { path, name }
    }

    /// Keys used to look up per-document boundary markers.
    pub fn marker_keys(&self) -> Vec<&str> {
        let stem = self.path.file_stem().and_then(|s| s.to_str());
        std::iter::once(self.name.as_str()).chain(stem).collect()
    }
}

/// Diagnostics for one processed document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub pages: usize,
    pub ocr_pages: usize,
    pub fallback_pages: usize,
    pub raw_chars: usize,
    pub boundary: BoundaryOutcome,
    pub sentences: usize,
    pub tokens: usize,
}

impl DocumentReport {
    pub fn is_empty(&self) -> bool {
        self.sentences == 0
    }
}

/// Totals for a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
    pub empty: usize,
    pub sentences: usize,
    pub ocr_pages: usize,
}

/// Ties the stages together for one configuration and recognition engine.
pub struct Pipeline<'a> {
    config: &'a CorpusConfig,
    recognizer: &'a dyn Recognizer,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a CorpusConfig, recognizer: &'a dyn Recognizer) -> Self {
        Self { config, recognizer }
    }

    pub fn process_raw_text(&self, raw: &str, marker_keys: &[&str]) -> (Corpus, BoundaryOutcome) {
        process_raw_text(self.config, raw, marker_keys)
    }

    /// Run every stage over one document.
    pub fn process_source(
        &self,
        source: &dyn PageSource,
        marker_keys: &[&str],
    ) -> (Corpus, DocumentReport) {
        let extractor = PageExtractor::new(&self.config.extraction, self.recognizer);
        let document = extractor.extract_document(source);
        let raw = assemble(&document);
        let (corpus, boundary) = self.process_raw_text(&raw.text, marker_keys);

        let report = DocumentReport {
            source: document.source.clone(),
            output: PathBuf::new(),
            pages: document.page_count(),
            ocr_pages: document.ocr_page_count(),
            fallback_pages: document.fallback_page_count(),
            raw_chars: raw.char_count(),
            boundary,
            sentences: corpus.len(),
            tokens: corpus.token_count(),
        };
        (corpus, report)
    }

    /// Extract one PDF and write its corpus into `output_dir`.
    pub fn process_file(&self, file: &SourceFile, output_dir: &Path) -> Result<DocumentReport> {
        let document = PdfDocument::open(&file.path)?;
        let (corpus, mut report) = self.process_source(&document, &file.marker_keys());

        let output = output_dir.join(format!("{}.txt", file.name));
        corpus.write_to(&output)?;
        report.output = output;
        Ok(report)
    }

    /// Process every PDF under `input_dir`, one output file per document.
    ///
    /// Documents run in parallel on `jobs` threads (rayon's default when
    /// `None`). A failing document is logged and skipped.
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        jobs: Option<usize>,
    ) -> Result<RunSummary> {
        let files = discover_documents(input_dir)?;
        info!("Found {} documents under {:?}", files.len(), input_dir);

        fs::create_dir_all(output_dir)
            .map_err(|e| PipelineError::io(output_dir, e))
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let run = || -> Vec<Option<DocumentReport>> {
            files
                .par_iter()
                .map(|file| {
                    let _span = info_span!("document", name = %file.name).entered();
                    let result = self.process_file(file, output_dir);
                    log_outcome(file, &result);
                    result.ok()
                })
                .collect()
        };

        let reports = match jobs {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build worker pool")?
                .install(run),
            None => run(),
        };

        let summary = reports.iter().fold(
            RunSummary {
                discovered: files.len(),
                ..RunSummary::default()
            },
            |mut summary, report| {
                match report {
                    Some(report) => {
                        summary.processed += 1;
                        summary.sentences += report.sentences;
                        summary.ocr_pages += report.ocr_pages;
                        if report.is_empty() {
                            summary.empty += 1;
                        }
                    }
                    None => summary.failed += 1,
                }
                summary
            },
        );

        Ok(summary)
    }
}

fn log_outcome(file: &SourceFile, result: &Result<DocumentReport>) {
    match result {
        Ok(report) if report.is_empty() => warn!(
            "{:?}: no sentences after filtering ({} pages, {} characters), wrote empty {:?}",
            file.path, report.pages, report.raw_chars, report.output
        ),
        Ok(report) => info!(
            "{:?} -> {:?}: {} pages ({} OCR, {} fallback), {} sentences, {} tokens",
            file.path,
            report.output,
            report.pages,
            report.ocr_pages,
            report.fallback_pages,
            report.sentences,
            report.tokens
        ),
        Err(e) => error!("Failed to process {:?}: {:#}", file.path, e),
    }
}

/// Normalize and segment text that is already assembled.
pub fn process_raw_text(
    config: &CorpusConfig,
    raw: &str,
    marker_keys: &[&str],
) -> (Corpus, BoundaryOutcome) {
    let normalized = Normalizer::for_document(config, marker_keys).normalize(raw);
    let corpus = Segmenter::from_config(config).segment(&normalized.text);
    (corpus, normalized.boundary)
}

/// Every `.pdf` under `root`, sorted by path.
pub fn discover_documents(root: &Path) -> Result<Vec<SourceFile>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(PipelineError::MissingInput(root.to_path_buf()).into());
    }

    // Output files are keyed by name, and some filesystems ignore case.
    let mut taken = HashSet::new();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let mut file = SourceFile::new(root, path);
        if !taken.insert(file.name.to_lowercase()) {
            let base = std::mem::take(&mut file.name);
            let mut suffix = 2;
            while !taken.insert(format!("{}_{}", base, suffix).to_lowercase()) {
                suffix += 1;
            }
            file.name = format!("{}_{}", base, suffix);
            warn!(
                "{:?} collides with another document named {}, writing {}.txt",
                file.path, base, file.name
            );
        }
        files.push(file);
    }

    Ok(files)
}
