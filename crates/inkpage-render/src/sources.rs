//! Built-in document sources.

use crate::document::DocumentSource;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use inkpage_core::{InkColor, InkError, InkResult};
use kurbo::Size;
use std::path::Path;

fn check_index(index: usize, count: usize) -> InkResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(InkError::render(
            index,
            format!("page index out of range (document has {count} page(s))"),
        ))
    }
}

/// Plain white pages of fixed sizes.
#[derive(Debug, Clone)]
pub struct BlankPagesSource {
    sizes: Vec<Size>,
}

impl BlankPagesSource {
    pub fn new(sizes: Vec<Size>) -> Self {
        Self { sizes }
    }
}

impl DocumentSource for BlankPagesSource {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn page_size(&self, index: usize) -> InkResult<Size> {
        check_index(index, self.sizes.len())?;
        Ok(self.sizes[index])
    }

    fn render(&self, index: usize, width: u32, height: u32) -> InkResult<RgbaImage> {
        check_index(index, self.sizes.len())?;
        Ok(RgbaImage::from_pixel(
            width,
            height,
            Rgba(InkColor::WHITE.to_rgba()),
        ))
    }
}

/// Pages backed by decoded images; one image pixel is one page unit.
#[derive(Debug, Clone)]
pub struct RasterPagesSource {
    pages: Vec<DynamicImage>,
}

impl RasterPagesSource {
    /// Wrap already-decoded images. Zero-sized images are rejected.
    pub fn from_images(pages: Vec<DynamicImage>) -> InkResult<Self> {
        if pages.is_empty() {
            return Err(InkError::LoadFailure("no pages".to_string()));
        }
        if let Some(index) = pages.iter().position(|p| p.width() == 0 || p.height() == 0) {
            return Err(InkError::LoadFailure(format!(
                "page {} is an empty image",
                index + 1
            )));
        }
        Ok(Self { pages })
    }

    /// Decode one page per file, in order.
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> InkResult<Self> {
        let pages = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                log::debug!("Loading page image {}", path.display());
                image::open(path).map_err(|e| {
                    InkError::LoadFailure(format!("{}: {}", path.display(), e))
                })
            })
            .collect::<InkResult<Vec<_>>>()?;
        Self::from_images(pages)
    }

    /// Decode one page from an in-memory encoded image.
    pub fn from_bytes(bytes: &[u8]) -> InkResult<Self> {
        let page = image::load_from_memory(bytes)
            .map_err(|e| InkError::LoadFailure(e.to_string()))?;
        Self::from_images(vec![page])
    }
}

impl DocumentSource for RasterPagesSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> InkResult<Size> {
        check_index(index, self.pages.len())?;
        let page = &self.pages[index];
        Ok(Size::new(f64::from(page.width()), f64::from(page.height())))
    }

    fn render(&self, index: usize, width: u32, height: u32) -> InkResult<RgbaImage> {
        check_index(index, self.pages.len())?;
        if width == 0 || height == 0 {
            return Err(InkError::render(index, "zero-sized render target"));
        }
        let page = &self.pages[index];
        if page.width() == width && page.height() == height {
            return Ok(page.to_rgba8());
        }
        Ok(page.resize_exact(width, height, FilterType::Triangle).to_rgba8())
    }
}
