use tracing::debug;

use crate::data::{Document, RawDocumentText, PAGE_SEPARATOR};

/// Join the chosen page texts of a document in page order.
pub fn assemble(document: &Document) -> RawDocumentText {
    let text = document
        .pages
        .iter()
        .map(|page| page.text())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    let raw = RawDocumentText {
        source: document.source.clone(),
        text,
        page_count: document.page_count(),
    };

    debug!(
        "Assembled {:?}: {} pages, {} characters",
        raw.source,
        raw.page_count,
        raw.char_count()
    );
    raw
}
