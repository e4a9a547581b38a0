use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Filtered sentences of one document, in order of occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub sentences: Vec<Vec<String>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sentence; empty sequences are never stored.
    pub fn push(&mut self, tokens: Vec<String>) {
        if !tokens.is_empty() {
            self.sentences.push(tokens);
        }
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    /// One space-joined line per sentence.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.sentences.iter().map(|tokens| tokens.join(" "))
    }

    /// Write the corpus, one sentence per line. An empty corpus gives an empty file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PipelineError::io(parent, e))
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }

        let file = fs::File::create(path)
            .map_err(|e| PipelineError::io(path, e))
            .with_context(|| format!("Failed to create corpus file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        for line in self.lines() {
            writeln!(writer, "{}", line)
                .with_context(|| format!("Failed to write corpus file: {:?}", path))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write corpus file: {:?}", path))?;

        Ok(())
    }

    /// Read a corpus file back, splitting each line on whitespace.
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::io(path, e))
            .with_context(|| format!("Failed to read corpus file: {:?}", path))?;

        let mut corpus = Self::new();
        for line in text.lines() {
            corpus.push(line.split_whitespace().map(str::to_string).collect());
        }
        Ok(corpus)
    }
}

/// Every token of every `.txt` corpus file under `dir`, files in path order.
pub fn load_tokens_from_dir(dir: &Path) -> Result<Vec<String>> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::MissingInput(dir.to_path_buf()).into());
    }

    info!("Found {} corpus files to analyze", files.len());

    let mut tokens = Vec::new();
    for path in &files {
        match Corpus::read_from(path) {
            Ok(corpus) => tokens.extend(corpus.sentences.into_iter().flatten()),
            Err(e) => warn!("Skipping unreadable corpus file {:?}: {:#}", path, e),
        }
    }

    Ok(tokens)
}
