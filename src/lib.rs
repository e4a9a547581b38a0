// Library exports for the CLI and for embedding the pipeline elsewhere

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use config::{BoundaryMarkers, CorpusConfig, ExtractionConfig, ScriptRange};
pub use data::{Corpus, PageSource, RasterImage};
pub use error::PipelineError;
pub use pipeline::{Pipeline, RunSummary};
pub use utils::{Recognizer, TesseractRecognizer};
