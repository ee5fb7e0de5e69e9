//! Collaborator traits: where page rasters come from and where composited
//! pages go.

use image::RgbaImage;
use inkpage_core::{AnnotationSession, InkResult};
use kurbo::Size;
use std::io::Write;

/// A paginated document that can rasterize its pages.
pub trait DocumentSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Intrinsic size of a page, in page units.
    fn page_size(&self, index: usize) -> InkResult<Size>;

    /// Rasterize a page at exactly `width` x `height` pixels.
    fn render(&self, index: usize, width: u32, height: u32) -> InkResult<RgbaImage>;
}

/// Sink for composited pages.
///
/// Pages are accumulated between [`start_page`](Self::start_page) and
/// [`finish_page`](Self::finish_page); nothing reaches the output until
/// [`write_to`](Self::write_to). [`close`](Self::close) releases whatever the
/// writer holds and must be safe to call more than once.
pub trait DocumentWriter {
    /// Drawing target for one page.
    type Canvas;

    fn start_page(&mut self, width: u32, height: u32) -> InkResult<Self::Canvas>;

    /// Draw `bitmap` with its top-left corner at `origin` (pixels).
    fn draw_bitmap(
        &mut self,
        canvas: &mut Self::Canvas,
        bitmap: &RgbaImage,
        origin: (u32, u32),
    ) -> InkResult<()>;

    fn finish_page(&mut self, canvas: Self::Canvas) -> InkResult<()>;

    /// Serialize every finished page to `sink`.
    fn write_to(&mut self, sink: &mut dyn Write) -> InkResult<()>;

    fn close(&mut self);
}

/// Page sizes of every page in `source`.
pub fn page_sizes<S: DocumentSource + ?Sized>(source: &S) -> InkResult<Vec<Size>> {
    (0..source.page_count())
        .map(|index| source.page_size(index))
        .collect()
}

/// Start an annotation session over `source`, fitted to `viewport_width`.
pub fn open_session<S: DocumentSource + ?Sized>(
    source: &S,
    viewport_width: f64,
) -> InkResult<AnnotationSession> {
    AnnotationSession::open(page_sizes(source)?, viewport_width)
}
