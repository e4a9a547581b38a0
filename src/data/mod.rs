mod corpus;
mod document;
mod ngram;
mod source;

pub use corpus::{load_tokens_from_dir, Corpus};
pub use document::{Document, ExtractionMethod, Page, RawDocumentText, PAGE_SEPARATOR};
pub use ngram::{render_report, FrequencyTable, NgramCount};
pub use source::{PageSource, RasterImage};
