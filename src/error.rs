use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures the pipeline distinguishes between.
///
/// Only `MissingInput` aborts a run. Recognition errors are recovered inside
/// the page extractor and I/O errors end a single document.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no source documents found under {0:?}")]
    MissingInput(PathBuf),

    #[error("optical recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("optical recognition timed out after {0:?}")]
    RecognitionTimeout(Duration),

    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
