use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

/// Gujarati block, U+0A80..=U+0AFE.
pub const GUJARATI_START: char = '\u{0A80}';
pub const GUJARATI_END: char = '\u{0AFE}';

/// Closed-class Gujarati function words dropped from every sentence.
pub const GUJARATI_STOP_WORDS: [&str; 14] = [
    "અને", "આ", "એ", "છે", "માં", "થી", "તો", "જ", "ને", "માટે", "હોય", "પણ", "તે", "કે",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages whose stripped native text has fewer characters than this go to OCR.
    pub ocr_threshold: usize,
    /// Raster scale relative to the 72 DPI page base.
    pub render_scale: f32,
    /// Tesseract language identifier.
    pub ocr_language: String,
    pub ocr_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_threshold: 100,
            render_scale: 2.0,
            ocr_language: "guj".to_string(),
            ocr_timeout_secs: 120,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.render_scale > 0.0, "render_scale must be > 0");
        ensure!(self.ocr_timeout_secs > 0, "ocr_timeout_secs must be > 0");
        ensure!(!self.ocr_language.trim().is_empty(), "ocr_language must not be empty");
        Ok(())
    }
}

/// Contiguous code-point range of the target script, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRange {
    pub start: char,
    pub end: char,
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self {
            start: GUJARATI_START,
            end: GUJARATI_END,
        }
    }
}

impl ScriptRange {
    pub fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ch: char) -> bool {
        (self.start..=self.end).contains(&ch)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.start <= self.end,
            "script range start U+{:04X} is after end U+{:04X}",
            self.start as u32,
            self.end as u32
        );
        Ok(())
    }
}

impl fmt::Display for ScriptRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}..=U+{:04X}", self.start as u32, self.end as u32)
    }
}

/// Literal substrings bounding the meaningful span of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryMarkers {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl BoundaryMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub extraction: ExtractionConfig,
    pub script: ScriptRange,
    /// Markers applied to every document without an entry in `document_markers`.
    pub markers: BoundaryMarkers,
    /// Per-document overrides keyed by output name (`<category>_<stem>`) or file stem.
    pub document_markers: HashMap<String, BoundaryMarkers>,
    pub stop_words: HashSet<String>,
    pub terminators: Vec<char>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            script: ScriptRange::default(),
            markers: BoundaryMarkers::default(),
            document_markers: HashMap::new(),
            stop_words: GUJARATI_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            terminators: vec!['.', '।'],
        }
    }
}

impl CorpusConfig {
    /// Load a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.script.validate()?;
        ensure!(!self.terminators.is_empty(), "terminators must not be empty");
        ensure!(
            self.terminators.iter().all(|c| !c.is_whitespace()),
            "terminators must not contain whitespace"
        );
        Ok(())
    }

    /// Markers for one document; the first key that has an override wins.
    pub fn markers_for(&self, keys: &[&str]) -> &BoundaryMarkers {
        keys.iter()
            .find_map(|key| self.document_markers.get(*key))
            .unwrap_or(&self.markers)
    }
}

impl fmt::Display for CorpusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "script={} ocr_threshold={} render_scale={} ocr_language={} stop_words={} terminators={:?}",
            self.script,
            self.extraction.ocr_threshold,
            self.extraction.render_scale,
            self.extraction.ocr_language,
            self.stop_words.len(),
            self.terminators
        )
    }
}
