//! Export compositor: page rasters plus annotations, one writer page each.

use crate::document::{DocumentSource, DocumentWriter};
use crate::painter::{page_transform, paint_commands, paint_strokes, with_pixmap};
use image::{Rgba, RgbaImage, imageops};
use inkpage_core::{DrawCommand, InkColor, InkError, InkResult, PageRegistry, PageView, Stroke};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default export scale: bitmap pixels per page unit.
pub const DEFAULT_EXPORT_SCALE: f64 = 2.0;

/// Largest page bitmap, in pixels (256 MiB of RGBA).
pub const MAX_BITMAP_PIXELS: u64 = 64 * 1024 * 1024;

/// Whole-pixel size, at least one pixel each way. `None` when not finite or
/// over [`MAX_BITMAP_PIXELS`].
fn checked_bitmap_size(width: f64, height: f64) -> Option<(u32, u32)> {
    if !(width.is_finite() && height.is_finite()) {
        return None;
    }
    let w = width.round().max(1.0);
    let h = height.round().max(1.0);
    if w * h > MAX_BITMAP_PIXELS as f64 {
        return None;
    }
    // Both sides are at most MAX_BITMAP_PIXELS here, well inside u32.
    Some((w as u32, h as u32))
}

/// Output settings for [`export_document`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Bitmap pixels per page unit, independent of the display scale.
    pub scale: f64,
    /// Fill behind the page raster.
    pub background: InkColor,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_EXPORT_SCALE,
            background: InkColor::WHITE,
        }
    }
}

impl ExportSettings {
    /// Bitmap size for a page, at least one pixel each way, or `None` when
    /// it would exceed [`MAX_BITMAP_PIXELS`].
    pub fn bitmap_size(&self, page_size: Size) -> Option<(u32, u32)> {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            DEFAULT_EXPORT_SCALE
        };
        checked_bitmap_size(page_size.width * scale, page_size.height * scale)
    }
}

/// Cooperative cancellation for a running export.
///
/// Clones share state; the export checks it between pages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// What an export produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub strokes: usize,
}

/// Closes the writer when dropped, whichever way the export ends.
struct CloseGuard<'a, W: DocumentWriter>(&'a mut W);

impl<W: DocumentWriter> Drop for CloseGuard<'_, W> {
    fn drop(&mut self) {
        self.0.close();
    }
}

impl<W: DocumentWriter> Deref for CloseGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.0
    }
}

impl<W: DocumentWriter> DerefMut for CloseGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.0
    }
}

/// Composite one page: background, page raster, then strokes mapped from
/// page space to bitmap pixels.
pub fn composite_page(
    page_size: Size,
    raster: &RgbaImage,
    strokes: &[Stroke],
    background: InkColor,
) -> RgbaImage {
    let (w, h) = raster.dimensions();
    let mut canvas = RgbaImage::from_pixel(w, h, Rgba(background.to_rgba()));
    imageops::overlay(&mut canvas, raster, 0, 0);
    if !strokes.is_empty() {
        let transform = page_transform(page_size, w, h);
        with_pixmap(&mut canvas, |pixmap| paint_strokes(pixmap, strokes, transform));
    }
    canvas
}

/// Export every page of `source` with its annotations from `registry`.
///
/// Pages are rendered at `settings.scale`, composited and handed to `writer`
/// in order. Any failure aborts the export before anything reaches `sink`;
/// the writer is closed on every path.
pub fn export_document<S, W>(
    source: &S,
    registry: &PageRegistry,
    writer: &mut W,
    sink: &mut dyn Write,
    settings: &ExportSettings,
    cancel: Option<&CancellationToken>,
) -> InkResult<ExportSummary>
where
    S: DocumentSource + ?Sized,
    W: DocumentWriter,
{
    let mut writer = CloseGuard(writer);
    let page_count = source.page_count();
    let mut strokes_written = 0;
    log::info!("Exporting {} page(s) at scale {}", page_count, settings.scale);

    for index in 0..page_count {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            log::info!("Export cancelled before page {}", index + 1);
            return Err(InkError::Cancelled);
        }

        let page_size = source.page_size(index)?;
        let (w, h) = settings.bitmap_size(page_size).ok_or_else(|| {
            InkError::render(
                index,
                format!(
                    "{}x{} page at scale {} exceeds {} pixels",
                    page_size.width, page_size.height, settings.scale, MAX_BITMAP_PIXELS
                ),
            )
        })?;
        let raster = source
            .render(index, w, h)
            .map_err(|e| render_failure(index, e))?;
        if raster.dimensions() != (w, h) {
            return Err(InkError::render(
                index,
                format!(
                    "expected {}x{} bitmap, got {}x{}",
                    w,
                    h,
                    raster.width(),
                    raster.height()
                ),
            ));
        }

        let strokes = registry
            .store_for(index)
            .map(|store| store.strokes())
            .unwrap_or_default();
        let composite = composite_page(page_size, &raster, strokes, settings.background);

        let mut canvas = writer.start_page(w, h)?;
        writer.draw_bitmap(&mut canvas, &composite, (0, 0))?;
        writer.finish_page(canvas)?;

        strokes_written += strokes.len();
        log::info!(
            "Exported page {}/{} ({} stroke(s))",
            index + 1,
            page_count,
            strokes.len()
        );
    }

    writer.write_to(sink)?;
    Ok(ExportSummary {
        pages: page_count,
        strokes: strokes_written,
    })
}

fn render_failure(page: usize, err: InkError) -> InkError {
    match err {
        InkError::RenderFailure { .. } => err,
        other => InkError::render(page, other.to_string()),
    }
}

/// Rasterize a page for the screen with its draw commands on top.
///
/// A failed render is replaced by a blank page so the user can keep working.
pub fn render_display_page<S: DocumentSource + ?Sized>(
    source: &S,
    index: usize,
    view: PageView,
    commands: &[DrawCommand],
) -> RgbaImage {
    let (w, h) = display_bitmap_size(view.display_size());

    let mut bitmap = match source.render(index, w, h) {
        Ok(raster) if raster.dimensions() == (w, h) => {
            let mut canvas = RgbaImage::from_pixel(w, h, Rgba(InkColor::WHITE.to_rgba()));
            imageops::overlay(&mut canvas, &raster, 0, 0);
            canvas
        }
        Ok(raster) => {
            log::warn!(
                "Page {} rendered at {}x{} instead of {}x{}; showing placeholder",
                index + 1,
                raster.width(),
                raster.height(),
                w,
                h
            );
            placeholder(w, h)
        }
        Err(e) => {
            log::warn!("Failed to render page {}: {}; showing placeholder", index + 1, e);
            placeholder(w, h)
        }
    };

    if !commands.is_empty() {
        with_pixmap(&mut bitmap, |pixmap| paint_commands(pixmap, commands));
    }
    bitmap
}

/// Display bitmap size, shrunk to fit [`MAX_BITMAP_PIXELS`] if needed.
fn display_bitmap_size(display: Size) -> (u32, u32) {
    if let Some(size) = checked_bitmap_size(display.width, display.height) {
        return size;
    }
    let fit = (MAX_BITMAP_PIXELS as f64 / (display.width * display.height)).sqrt();
    let size = checked_bitmap_size(
        (display.width * fit).floor(),
        (display.height * fit).floor(),
    )
    .unwrap_or((1, 1));
    log::warn!(
        "Display page {}x{} over pixel budget; rendering at {}x{}",
        display.width,
        display.height,
        size.0,
        size.1
    );
    size
}

/// Blank white page.
pub fn placeholder(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(InkColor::WHITE.to_rgba()))
}
