//! InkPage Render Library
//!
//! Document collaborator traits, a tiny-skia stroke painter and the export
//! compositor that flattens annotations onto page rasters.

pub mod compositor;
pub mod document;
pub mod painter;
pub mod sources;

pub use compositor::{
    CancellationToken, DEFAULT_EXPORT_SCALE, ExportSettings, ExportSummary, MAX_BITMAP_PIXELS,
    composite_page, export_document, placeholder, render_display_page,
};
pub use document::{DocumentSource, DocumentWriter, open_session, page_sizes};
pub use painter::{page_transform, paint_commands, paint_strokes, with_pixmap};
pub use sources::{BlankPagesSource, RasterPagesSource};
