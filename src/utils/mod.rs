pub mod ocr;
pub mod pdf_parser;
pub mod text_processor;

pub use ocr::{command_available, Recognizer, TesseractRecognizer};
pub use pdf_parser::{render_page_png, PdfDocument};
pub use text_processor::{
    collapse_whitespace, remove_digits, remove_parentheticals, retain_script_chars,
};
