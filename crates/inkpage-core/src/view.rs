//! Mapping between display space and page space.
//!
//! The page is shown fitted to the viewport width, so one display pixel
//! covers `1 / scale` page units. Strokes are stored in page space; only the
//! capture surface and the on-screen painter ever see display coordinates.

use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

/// How one page is laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    /// Intrinsic page size in page units.
    pub page_size: Size,
    /// Display pixels per page unit.
    pub scale: f64,
}

impl Default for PageView {
    fn default() -> Self {
        Self::identity(Size::ZERO)
    }
}

impl PageView {
    /// A view that shows the page at one display pixel per page unit.
    pub fn identity(page_size: Size) -> Self {
        Self {
            page_size,
            scale: 1.0,
        }
    }

    /// Fit the page to `viewport_width` display pixels.
    ///
    /// Degenerate sizes fall back to a scale of one.
    pub fn fit_width(page_size: Size, viewport_width: f64) -> Self {
        let scale = viewport_width / page_size.width;
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { page_size, scale }
    }

    /// Size of the page on screen.
    pub fn display_size(&self) -> Size {
        self.page_size * self.scale
    }

    /// Page space to display space.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale)
    }

    /// Display space to page space.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale)
    }

    pub fn display_to_page(&self, point: Point) -> Point {
        self.inverse_transform() * point
    }

    pub fn page_to_display(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Convert a display-space length (e.g. a pen width) to page units.
    pub fn length_to_page(&self, length: f64) -> f64 {
        length / self.scale
    }

    pub fn length_to_display(&self, length: f64) -> f64 {
        length * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width() {
        let view = PageView::fit_width(Size::new(600.0, 800.0), 1200.0);
        assert!((view.scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(view.display_size(), Size::new(1200.0, 1600.0));
    }

    #[test]
    fn test_round_trip() {
        let view = PageView::fit_width(Size::new(612.0, 792.0), 1080.0);
        let display = Point::new(333.0, 444.0);
        let back = view.page_to_display(view.display_to_page(display));
        assert!(back.distance(display) < 1e-9);
    }

    #[test]
    fn test_degenerate_page_falls_back() {
        let view = PageView::fit_width(Size::ZERO, 800.0);
        assert!((view.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lengths() {
        let view = PageView::fit_width(Size::new(100.0, 100.0), 400.0);
        assert!((view.length_to_page(8.0) - 2.0).abs() < f64::EPSILON);
        assert!((view.length_to_display(2.0) - 8.0).abs() < f64::EPSILON);
    }
}
