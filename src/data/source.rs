use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A rendered page image on disk.
///
/// When produced by a real rasterizer the image lives in a scratch
/// directory that is removed when the value is dropped.
#[derive(Debug)]
pub struct RasterImage {
    path: PathBuf,
    width: u32,
    height: u32,
    scratch: Option<TempDir>,
}

impl RasterImage {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            scratch: None,
        }
    }

    pub fn in_scratch(scratch: TempDir, path: PathBuf, width: u32, height: u32) -> Self {
        Self {
            path,
            width,
            height,
            scratch: Some(scratch),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Directory where collaborators may put derived files for this image.
    pub fn work_dir(&self) -> &Path {
        match &self.scratch {
            Some(dir) => dir.path(),
            None => self.path.parent().unwrap_or_else(|| Path::new(".")),
        }
    }
}

/// Page-level access to one source document
pub trait PageSource {
    /// Path the document was loaded from.
    fn source(&self) -> &Path;

    fn page_count(&self) -> usize;

    /// Text layer of one page, possibly empty.
    fn native_text(&self, index: usize) -> Result<String>;

    /// Render one page at `scale` times its native resolution.
    fn rasterize(&self, index: usize, scale: f32) -> Result<RasterImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_dir_without_scratch_is_parent() {
        let image = RasterImage::new("/tmp/pages/page-1.png", 20, 30);
        assert_eq!(image.work_dir(), Path::new("/tmp/pages"));
        assert_eq!(image.dimensions(), (20, 30));
    }

    #[test]
    fn test_scratch_removed_on_drop() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path().to_path_buf();
        let image = RasterImage::in_scratch(scratch, dir.join("page.png"), 1, 1);
        assert_eq!(image.work_dir(), dir.as_path());
        drop(image);
        assert!(!dir.exists());
    }
}
