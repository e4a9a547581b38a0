use tracing::warn;

use crate::config::{BoundaryMarkers, CorpusConfig, ScriptRange};
use crate::utils::{collapse_whitespace, remove_digits, remove_parentheticals, retain_script_chars};

use super::validator::TokenValidator;

/// What boundary extraction did with the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// No markers configured; whole text used.
    Unbounded,
    /// Sliced from the first start marker to the last end marker.
    Trimmed,
    /// A configured marker was not found; whole text used.
    MarkerMissing,
    /// The last end marker precedes the first start marker; span is empty.
    Inverted,
}

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    pub boundary: BoundaryOutcome,
}

/// Trims a raw document to its content span and strips everything that is
/// not a valid target-script token or a sentence terminator.
#[derive(Debug, Clone)]
pub struct Normalizer {
    markers: BoundaryMarkers,
    script: ScriptRange,
    terminators: Vec<char>,
    validator: TokenValidator,
}

impl Normalizer {
    pub fn new(markers: BoundaryMarkers, script: ScriptRange, terminators: Vec<char>) -> Self {
        Self {
            markers,
            script,
            terminators,
            validator: TokenValidator::new(script),
        }
    }

    /// Normalizer using the markers configured for one document.
    pub fn for_document(config: &CorpusConfig, keys: &[&str]) -> Self {
        Self::new(
            config.markers_for(keys).clone(),
            config.script,
            config.terminators.clone(),
        )
    }

    /// Slice `raw` to `[first start marker, last end marker)`.
    pub fn extract_core<'t>(&self, raw: &'t str) -> (&'t str, BoundaryOutcome) {
        let (start_marker, end_marker) = match (&self.markers.start, &self.markers.end) {
            (None, None) => return (raw, BoundaryOutcome::Unbounded),
            (start, end) => (start.as_deref(), end.as_deref()),
        };

        let start = match start_marker {
            Some(marker) => raw.find(marker),
            None => Some(0),
        };
        let end = match end_marker {
            Some(marker) => raw.rfind(marker),
            None => Some(raw.len()),
        };

        match (start, end) {
            (Some(start), Some(end)) if start <= end => (&raw[start..end], BoundaryOutcome::Trimmed),
            (Some(_), Some(_)) => {
                warn!("End marker precedes start marker, content span is empty");
                ("", BoundaryOutcome::Inverted)
            }
            _ => {
                warn!("Could not find start/end markers, processing the whole text");
                (raw, BoundaryOutcome::MarkerMissing)
            }
        }
    }

    /// Run boundary extraction, noise removal and token validation.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let (core, boundary) = self.extract_core(raw);

        let text = collapse_whitespace(core);
        let text = remove_digits(&text);
        let text = remove_parentheticals(&text);
        let text = retain_script_chars(&text, &self.script, &self.terminators);
        let text = self.validator.filter_tokens(&text);

        NormalizedText { text, boundary }
    }
}
