use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::data::{Document, ExtractionMethod, Page, PageSource};
use crate::utils::Recognizer;

/// Chooses between the text layer and optical recognition for each page.
pub struct PageExtractor<'a> {
    config: &'a ExtractionConfig,
    recognizer: &'a dyn Recognizer,
}

impl<'a> PageExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig, recognizer: &'a dyn Recognizer) -> Self {
        Self { config, recognizer }
    }

    /// Whether native text this sparse should go through recognition.
    pub fn needs_ocr(&self, native_text: &str) -> bool {
        native_text.trim().chars().count() < self.config.ocr_threshold
    }

    /// Extract one page. Never fails: unreadable pages come back empty.
    pub fn extract_page(&self, source: &dyn PageSource, index: usize) -> Page {
        let native_text = match source.native_text(index) {
            Ok(text) => text,
            Err(e) => {
                warn!("Text layer unreadable for {:?} page {}: {:#}", source.source(), index, e);
                String::new()
            }
        };

        if !self.needs_ocr(&native_text) {
            return Page {
                index,
                native_text,
                ocr_text: None,
                method: ExtractionMethod::Native,
            };
        }

        debug!(
            "Page {} of {:?} has sparse text, running OCR",
            index,
            source.source()
        );

        let recognized = source
            .rasterize(index, self.config.render_scale)
            .and_then(|image| self.recognizer.recognize(&image, &self.config.ocr_language));

        match recognized {
            Ok(ocr_text) => Page {
                index,
                native_text,
                ocr_text: Some(ocr_text),
                method: ExtractionMethod::Ocr,
            },
            Err(e) => {
                warn!(
                    "OCR failed for {:?} page {}, keeping text layer: {:#}",
                    source.source(),
                    index,
                    e
                );
                Page {
                    index,
                    native_text,
                    ocr_text: None,
                    method: ExtractionMethod::NativeFallback,
                }
            }
        }
    }

    /// Extract every page in page order.
    pub fn extract_document(&self, source: &dyn PageSource) -> Document {
        let pages = (0..source.page_count())
            .map(|index| self.extract_page(source, index))
            .collect();
        Document::new(source.source(), pages)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::RasterImage;
    use crate::error::PipelineError;
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory document whose pages can always be "rendered".
    pub(crate) struct FakeSource {
        pub path: PathBuf,
        pub pages: Vec<String>,
    }

    impl FakeSource {
        pub fn new(pages: &[&str]) -> Self {
            Self {
                path: PathBuf::from("class11/biology.pdf"),
                pages: pages.iter().map(|p| p.to_string()).collect(),
            }
        }
    }

    impl PageSource for FakeSource {
        fn source(&self) -> &Path {
            &self.path
        }

        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn native_text(&self, index: usize) -> Result<String> {
            Ok(self.pages[index].clone())
        }

        fn rasterize(&self, index: usize, _scale: f32) -> Result<RasterImage> {
            Ok(RasterImage::new(format!("page-{}.png", index), 10, 10))
        }
    }

    pub(crate) enum Outcome {
        Text(String),
        Crash,
        Timeout(Duration),
    }

    /// Answers with a fixed outcome and counts how often it was asked.
    pub(crate) struct FakeRecognizer {
        pub outcome: Outcome,
        pub calls: AtomicUsize,
    }

    impl FakeRecognizer {
        fn with_outcome(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn returning(text: &str) -> Self {
            Self::with_outcome(Outcome::Text(text.to_string()))
        }

        pub fn failing() -> Self {
            Self::with_outcome(Outcome::Crash)
        }

        pub fn timing_out(after: Duration) -> Self {
            Self::with_outcome(Outcome::Timeout(after))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Recognizer for FakeRecognizer {
        fn recognize(&self, _image: &RasterImage, language: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(language, "guj");
            match &self.outcome {
                Outcome::Text(text) => Ok(text.clone()),
                Outcome::Crash => {
                    Err(PipelineError::RecognitionFailed("engine crashed".to_string()).into())
                }
                Outcome::Timeout(after) => Err(PipelineError::RecognitionTimeout(*after).into()),
            }
        }
    }

    fn padded(len: usize) -> String {
        format!("  {}\n", "ક".repeat(len))
    }

    #[test]
    fn test_threshold_boundary() {
        let config = ExtractionConfig::default();
        let recognizer = FakeRecognizer::returning("ocr");
        let extractor = PageExtractor::new(&config, &recognizer);

        let below = padded(99);
        let at = padded(100);
        let source = FakeSource::new(&[below.as_str(), at.as_str()]);

        let first = extractor.extract_page(&source, 0);
        assert_eq!(first.method, ExtractionMethod::Ocr);
        assert_eq!(recognizer.calls(), 1);

        let second = extractor.extract_page(&source, 1);
        assert_eq!(second.method, ExtractionMethod::Native);
        assert_eq!(recognizer.calls(), 1);
        assert_eq!(second.text(), at);
    }

    #[test]
    fn test_ocr_text_is_chosen() {
        let config = ExtractionConfig::default();
        let recognizer = FakeRecognizer::returning("ઓસીઆર લખાણ");
        let extractor = PageExtractor::new(&config, &recognizer);

        let page = extractor.extract_page(&FakeSource::new(&["x"]), 0);
        assert_eq!(page.text(), "ઓસીઆર લખાણ");
        assert_eq!(page.native_text, "x");
    }

    #[test]
    fn test_failed_recognition_falls_back_to_native() {
        let config = ExtractionConfig::default();
        let recognizer = FakeRecognizer::failing();
        let extractor = PageExtractor::new(&config, &recognizer);

        let page = extractor.extract_page(&FakeSource::new(&["ટૂંકું"]), 0);
        assert_eq!(page.method, ExtractionMethod::NativeFallback);
        assert_eq!(page.text(), "ટૂંકું");
        assert_eq!(recognizer.calls(), 1);
    }

    #[test]
    fn test_timed_out_recognition_falls_back_to_native() {
        let config = ExtractionConfig::default();
        let recognizer = FakeRecognizer::timing_out(Duration::from_secs(120));
        let extractor = PageExtractor::new(&config, &recognizer);

        let document = extractor.extract_document(&FakeSource::new(&["ટૂંકું", "પાનું"]));
        assert_eq!(document.fallback_page_count(), 2);
        assert_eq!(document.pages[0].text(), "ટૂંકું");
        assert_eq!(document.pages[1].method, ExtractionMethod::NativeFallback);
        assert_eq!(recognizer.calls(), 2);
    }

    #[test]
    fn test_empty_page_is_not_an_error() {
        let config = ExtractionConfig::default();
        let recognizer = FakeRecognizer::returning("");
        let extractor = PageExtractor::new(&config, &recognizer);

        let page = extractor.extract_page(&FakeSource::new(&[""]), 0);
        assert_eq!(page.text(), "");
    }

    #[test]
    fn test_configurable_threshold() {
        let config = ExtractionConfig {
            ocr_threshold: 3,
            ..ExtractionConfig::default()
        };
        let recognizer = FakeRecognizer::returning("ocr");
        let extractor = PageExtractor::new(&config, &recognizer);

        assert!(extractor.needs_ocr("કખ"));
        assert!(!extractor.needs_ocr(" કખગ "));
    }

    #[test]
    fn test_extract_document_keeps_page_order() {
        let config = ExtractionConfig {
            ocr_threshold: 0,
            ..ExtractionConfig::default()
        };
        let recognizer = FakeRecognizer::failing();
        let extractor = PageExtractor::new(&config, &recognizer);

        let doc = extractor.extract_document(&FakeSource::new(&["એક", "બે", "ત્રણ"]));
        let texts: Vec<&str> = doc.pages.iter().map(Page::text).collect();
        assert_eq!(texts, vec!["એક", "બે", "ત્રણ"]);
        assert_eq!(doc.pages[2].index, 2);
        assert_eq!(recognizer.calls(), 0);
    }
}
