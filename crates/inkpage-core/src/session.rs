//! Document session: the open document, the page on screen and the
//! annotations of every page.

use crate::config::HostConfig;
use crate::eraser::{Eraser, EraserConfig};
use crate::error::{InkError, InkResult};
use crate::history::PageLayer;
use crate::input::PointerSample;
use crate::registry::PageRegistry;
use crate::surface::{CaptureSurface, DrawCommand, SurfaceResponse};
use crate::view::PageView;
use kurbo::Size;

/// Editing state for one loaded document.
///
/// Only the page on screen lives in the capture surface; every other page is
/// parked in the registry. Navigation saves the current page before the
/// surface is torn down and loads the target page after it is rebuilt.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    page_sizes: Vec<Size>,
    viewport_width: f64,
    current_page: usize,
    registry: PageRegistry,
    surface: CaptureSurface,
    eraser: Eraser,
}

impl AnnotationSession {
    /// Open a document with the given page sizes, showing page 0.
    pub fn open(page_sizes: Vec<Size>, viewport_width: f64) -> InkResult<Self> {
        Self::open_with(page_sizes, viewport_width, EraserConfig::default())
    }

    pub fn open_with(
        page_sizes: Vec<Size>,
        viewport_width: f64,
        eraser: EraserConfig,
    ) -> InkResult<Self> {
        validate_pages(&page_sizes)?;
        let eraser = Eraser::new(eraser);
        let view = PageView::fit_width(page_sizes[0], viewport_width);
        log::debug!(
            "Opened document with {} page(s), viewport width {}",
            page_sizes.len(),
            viewport_width
        );
        Ok(Self {
            page_sizes,
            viewport_width,
            current_page: 0,
            registry: PageRegistry::new(),
            surface: CaptureSurface::new(view, eraser),
            eraser,
        })
    }

    /// Replace the document. All annotations of the previous one are dropped.
    pub fn load_document(&mut self, page_sizes: Vec<Size>) -> InkResult<()> {
        validate_pages(&page_sizes)?;
        self.registry.clear();
        self.page_sizes = page_sizes;
        self.current_page = 0;
        self.surface = CaptureSurface::new(self.view_for(0), self.eraser);
        log::debug!("Loaded new document with {} page(s)", self.page_sizes.len());
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self, page: usize) -> Option<Size> {
        self.page_sizes.get(page).copied()
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Layout of the page on screen.
    pub fn view(&self) -> PageView {
        self.surface.view()
    }

    pub fn surface(&self) -> &CaptureSurface {
        &self.surface
    }

    fn view_for(&self, page: usize) -> PageView {
        PageView::fit_width(self.page_sizes[page], self.viewport_width)
    }

    /// Forward a pointer sample to the page on screen.
    pub fn handle_pointer(&mut self, sample: PointerSample, config: &HostConfig) -> SurfaceResponse {
        self.surface.handle(sample, config)
    }

    /// Show `page`. Out-of-range pages are ignored and reported as `false`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= self.page_count() {
            log::warn!(
                "Ignoring navigation to page {} of {}",
                page + 1,
                self.page_count()
            );
            return false;
        }
        if page == self.current_page {
            return false;
        }

        self.flush();
        let layer = self.registry.load(page);
        let view = self.view_for(page);
        self.surface = CaptureSurface::new(view, self.eraser);
        self.surface.load_layer(layer, view);
        self.current_page = page;
        log::debug!("Showing page {}", self.page_label());
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.go_to_page(self.current_page - 1)
    }

    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    /// "current/total", 1-based.
    pub fn page_label(&self) -> String {
        format!("{}/{}", self.current_page + 1, self.page_count())
    }

    /// Save the page on screen into the registry. Any gesture in progress is
    /// committed first.
    pub fn flush(&mut self) {
        self.surface.finish_gesture();
        self.registry
            .save_current(self.current_page, self.surface.layer());
    }

    /// Rebuild the surface for a new viewport width (e.g. rotation).
    pub fn relayout(&mut self, viewport_width: f64) {
        self.flush();
        self.viewport_width = viewport_width;
        let view = self.view_for(self.current_page);
        let layer = self.registry.load(self.current_page);
        self.surface = CaptureSurface::new(view, self.eraser);
        self.surface.load_layer(layer, view);
        log::debug!(
            "Relayout to viewport width {}, display scale {}",
            viewport_width,
            view.scale
        );
    }

    pub fn undo(&mut self) -> bool {
        self.surface.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.surface.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.surface.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.surface.can_redo()
    }

    /// Remove every stroke on the page on screen, undoably.
    pub fn clear_page(&mut self) -> bool {
        self.surface.clear()
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        self.surface.draw_commands()
    }

    /// Annotations of the page on screen.
    pub fn current_layer(&self) -> &PageLayer {
        self.surface.layer()
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    /// Flush the page on screen and copy out every page's annotations.
    pub fn export_snapshot(&mut self) -> PageRegistry {
        self.flush();
        self.registry.clone()
    }
}

fn validate_pages(page_sizes: &[Size]) -> InkResult<()> {
    if page_sizes.is_empty() {
        return Err(InkError::LoadFailure("document has no pages".to_string()));
    }
    if let Some((index, size)) = page_sizes
        .iter()
        .enumerate()
        .find(|(_, size)| !(size.width > 0.0 && size.height > 0.0 && size.is_finite()))
    {
        return Err(InkError::LoadFailure(format!(
            "page {} has invalid size {}x{}",
            index + 1,
            size.width,
            size.height
        )));
    }
    Ok(())
}
