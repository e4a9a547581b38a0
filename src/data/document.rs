use std::fmt;
use std::path::PathBuf;

/// Separator placed between consecutive pages of one document.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// How the text of a page was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Text layer was rich enough.
    Native,
    /// Text layer was sparse and recognition succeeded.
    Ocr,
    /// Text layer was sparse, recognition failed, text layer kept anyway.
    NativeFallback,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Native => "native",
            Self::Ocr => "ocr",
            Self::NativeFallback => "native_fallback",
        };
        f.write_str(label)
    }
}

/// One extracted page. Never mutated after the method is chosen.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub native_text: String,
    pub ocr_text: Option<String>,
    pub method: ExtractionMethod,
}

impl Page {
    /// The text chosen for this page.
    pub fn text(&self) -> &str {
        match (self.method, &self.ocr_text) {
            (ExtractionMethod::Ocr, Some(ocr)) => ocr,
            _ => &self.native_text,
        }
    }
}

/// Pages of one source file, in page order.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: PathBuf,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(source: impl Into<PathBuf>, pages: Vec<Page>) -> Self {
        Self {
            source: source.into(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn ocr_page_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.method == ExtractionMethod::Ocr)
            .count()
    }

    pub fn fallback_page_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.method == ExtractionMethod::NativeFallback)
            .count()
    }
}

/// All chosen page texts of a document joined by [`PAGE_SEPARATOR`].
#[derive(Debug, Clone)]
pub struct RawDocumentText {
    pub source: PathBuf,
    pub text: String,
    pub page_count: usize,
}

impl RawDocumentText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
