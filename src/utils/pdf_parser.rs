use anyhow::{bail, Context, Result};
use pdf_extract::extract_text_by_pages;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::data::{PageSource, RasterImage};

/// A PDF whose text layer has been read page by page.
///
/// Rasterization re-reads the file through `pdftoppm` on demand.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    path: PathBuf,
    pages: Vec<String>,
}

impl PdfDocument {
    /// Open a PDF and extract its text layer
    pub fn open(path: &Path) -> Result<Self> {
        info!("Extracting text layer from PDF: {:?}", path);

        let pages = extract_text_by_pages(path)
            .with_context(|| format!("Failed to extract text from PDF: {:?}", path))?;

        let empty = pages.iter().filter(|p| p.trim().is_empty()).count();
        if empty == pages.len() && !pages.is_empty() {
            warn!("PDF has no extractable text layer, every page needs OCR: {:?}", path);
        }

        info!("Read {} pages from PDF ({} without text)", pages.len(), empty);

        Ok(Self {
            path: path.to_path_buf(),
            pages,
        })
    }
}

impl PageSource for PdfDocument {
    fn source(&self) -> &Path {
        &self.path
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn native_text(&self, index: usize) -> Result<String> {
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    fn rasterize(&self, index: usize, scale: f32) -> Result<RasterImage> {
        render_page_png(&self.path, index, scale)
    }
}

/// Rendering resolution for a scale factor over the 72 DPI page base.
pub fn render_dpi(scale: f32) -> u32 {
    (72.0 * scale).round().max(1.0) as u32
}

/// Render a single page (0-based) to PNG with `pdftoppm`.
pub fn render_page_png(pdf_path: &Path, index: usize, scale: f32) -> Result<RasterImage> {
    let page_number = (index + 1).to_string();
    let dpi = render_dpi(scale);

    let scratch = tempfile::Builder::new()
        .prefix("textbook_corpus_page_")
        .tempdir()
        .context("Failed to create scratch directory for page raster")?;
    let output_root = scratch.path().join("page");
    let png_path = output_root.with_extension("png");

    let output = Command::new("pdftoppm")
        .arg("-f")
        .arg(&page_number)
        .arg("-l")
        .arg(&page_number)
        .arg("-r")
        .arg(dpi.to_string())
        .arg("-singlefile")
        .arg("-png")
        .arg(pdf_path)
        .arg(&output_root)
        .output()
        .with_context(|| format!("Failed to execute pdftoppm for {:?}", pdf_path))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftoppm returned non-zero exit status for {:?} page {}: {}",
            pdf_path,
            page_number,
            stderr.trim()
        );
    }

    if !png_path.exists() {
        bail!(
            "pdftoppm did not produce an image for {:?} page {}",
            pdf_path,
            page_number
        );
    }

    let (width, height) = image::image_dimensions(&png_path)
        .with_context(|| format!("Rendered page is not a readable image: {:?}", png_path))?;
    debug!("Rendered page {} at {} DPI ({}x{})", page_number, dpi, width, height);

    Ok(RasterImage::in_scratch(scratch, png_path, width, height))
}
