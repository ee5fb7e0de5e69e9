//! Interactive capture surface.
//!
//! Turns a stream of pointer samples into committed strokes and eraser
//! removals on the page currently on screen. The surface is pure data: it
//! reads the host configuration per event, stores everything in page space,
//! and exposes display-space [`DrawCommand`]s for whatever paints the screen.

use crate::config::{HostConfig, InputMode};
use crate::eraser::Eraser;
use crate::history::PageLayer;
use crate::input::{PointerPhase, PointerSample};
use crate::stroke::{InkColor, LiveStroke, Stroke};
use crate::view::PageView;
use kurbo::Point;

/// State of the current pointer gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// A pen stroke is being drawn (page space).
    Drawing(LiveStroke),
    /// The eraser is down.
    Erasing,
}

/// Outcome of feeding one pointer sample to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceResponse {
    /// False when the host should handle the event itself (pan mode).
    pub consumed: bool,
    /// The page needs repainting.
    pub redraw: bool,
    /// Strokes were committed or removed; undo/redo availability may differ.
    pub changed: bool,
}

impl SurfaceResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::default()
        }
    }

    fn redraw() -> Self {
        Self {
            consumed: true,
            redraw: true,
            changed: false,
        }
    }

    fn changed() -> Self {
        Self {
            consumed: true,
            redraw: true,
            changed: true,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            consumed: self.consumed || other.consumed,
            redraw: self.redraw || other.redraw,
            changed: self.changed || other.changed,
        }
    }
}

/// One polyline to paint, in display space.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub points: Vec<Point>,
    pub color: InkColor,
    pub width: f64,
    /// Part of the stroke still being drawn.
    pub live: bool,
}

/// Editing surface for the page on screen.
#[derive(Debug, Clone, Default)]
pub struct CaptureSurface {
    layer: PageLayer,
    view: PageView,
    eraser: Eraser,
    gesture: GestureState,
}

impl CaptureSurface {
    pub fn new(view: PageView, eraser: Eraser) -> Self {
        Self {
            layer: PageLayer::new(),
            view,
            eraser,
            gesture: GestureState::Idle,
        }
    }

    /// Handle one pointer sample.
    pub fn handle(&mut self, sample: PointerSample, config: &HostConfig) -> SurfaceResponse {
        if !config.mode.edits() {
            // A mode switch mid-gesture still commits what was drawn.
            let finished = self.finish_gesture();
            return SurfaceResponse {
                consumed: false,
                ..finished
            };
        }

        match sample.phase {
            PointerPhase::Down => {
                let finished = self.finish_gesture();
                finished.merge(self.begin(sample, config))
            }
            PointerPhase::Move => self.extend(sample, config),
            PointerPhase::Up => {
                if let GestureState::Drawing(live) = &mut self.gesture {
                    let width = config.pressure_width(sample.pressure);
                    live.set_width(self.view.length_to_page(width));
                }
                self.finish_gesture().merge(SurfaceResponse::consumed())
            }
            PointerPhase::Cancel => self.finish_gesture().merge(SurfaceResponse::consumed()),
        }
    }

    fn begin(&mut self, sample: PointerSample, config: &HostConfig) -> SurfaceResponse {
        let point = self.view.display_to_page(sample.position);
        let width = self
            .view
            .length_to_page(config.pressure_width(sample.pressure));

        match config.mode {
            InputMode::Pen => {
                self.gesture = GestureState::Drawing(LiveStroke::begin(point, config.pen_color, width));
                SurfaceResponse::redraw()
            }
            InputMode::Eraser => {
                self.gesture = GestureState::Erasing;
                self.erase(point, width)
            }
            InputMode::Pan => SurfaceResponse::ignored(),
        }
    }

    fn extend(&mut self, sample: PointerSample, config: &HostConfig) -> SurfaceResponse {
        let point = self.view.display_to_page(sample.position);
        let width = self
            .view
            .length_to_page(config.pressure_width(sample.pressure));

        if let GestureState::Drawing(live) = &mut self.gesture {
            live.add_point(point, width);
            return SurfaceResponse::redraw();
        }
        if self.gesture == GestureState::Erasing {
            self.erase(point, width)
        } else {
            SurfaceResponse::consumed()
        }
    }

    fn erase(&mut self, point: Point, radius: f64) -> SurfaceResponse {
        let removed = self.eraser.erase_at(&mut self.layer, point, radius);
        if removed.is_empty() {
            SurfaceResponse::consumed()
        } else {
            SurfaceResponse::changed()
        }
    }

    /// End whatever gesture is in progress, committing a pen stroke.
    pub fn finish_gesture(&mut self) -> SurfaceResponse {
        match std::mem::take(&mut self.gesture) {
            GestureState::Drawing(live) => {
                let stroke = live.commit();
                log::debug!(
                    "Committed stroke {} with {} point(s)",
                    stroke.id(),
                    stroke.points().len()
                );
                self.layer.add_stroke(stroke);
                SurfaceResponse::changed()
            }
            GestureState::Erasing | GestureState::Idle => SurfaceResponse::ignored(),
        }
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn layer(&self) -> &PageLayer {
        &self.layer
    }

    pub fn view(&self) -> PageView {
        self.view
    }

    pub fn eraser(&self) -> &Eraser {
        &self.eraser
    }

    /// Commit any gesture and hand out the page's annotations, leaving the
    /// surface empty.
    pub fn take_layer(&mut self) -> PageLayer {
        self.finish_gesture();
        std::mem::take(&mut self.layer)
    }

    /// Show another page's annotations.
    pub fn load_layer(&mut self, layer: PageLayer, view: PageView) {
        self.gesture = GestureState::Idle;
        self.layer = layer;
        self.view = view;
    }

    /// Committed strokes, page space.
    pub fn strokes(&self) -> &[Stroke] {
        self.layer.store().strokes()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        self.layer.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        self.layer.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.layer.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.layer.can_redo()
    }

    /// Remove every stroke on the page as one undoable edit.
    pub fn clear(&mut self) -> bool {
        self.finish_gesture();
        self.layer.clear_all()
    }

    /// Everything to paint, back to front, in display space.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let to_display = self.view.transform();
        let mut commands: Vec<DrawCommand> = self
            .strokes()
            .iter()
            .map(|stroke| DrawCommand {
                points: stroke.points().iter().map(|p| to_display * *p).collect(),
                color: stroke.color(),
                width: self.view.length_to_display(stroke.width()),
                live: false,
            })
            .collect();

        if let GestureState::Drawing(live) = &self.gesture {
            commands.push(DrawCommand {
                points: live.points().iter().map(|p| to_display * *p).collect(),
                color: live.color(),
                width: self.view.length_to_display(live.width()),
                live: true,
            });
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn surface() -> CaptureSurface {
        CaptureSurface::new(PageView::identity(Size::new(100.0, 100.0)), Eraser::default())
    }

    fn pen(width: f64, color: InkColor) -> HostConfig {
        HostConfig {
            mode: InputMode::Pen,
            pen_color: color,
            pen_width: width,
        }
    }

    #[test]
    fn test_draw_and_commit() {
        let mut surface = surface();
        let config = pen(2.0, InkColor::RED);

        let down = surface.handle(PointerSample::down(0.0, 0.0), &config);
        assert!(down.consumed && down.redraw && !down.changed);
        assert!(matches!(surface.gesture(), GestureState::Drawing(_)));

        surface.handle(PointerSample::moved(10.0, 10.0), &config);
        let up = surface.handle(PointerSample::up(10.0, 10.0), &config);
        assert!(up.changed && up.redraw);

        assert_eq!(surface.strokes().len(), 1);
        let stroke = &surface.strokes()[0];
        assert_eq!(stroke.points(), &[Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert_eq!(stroke.color(), InkColor::RED);
        assert!((stroke.width() - 4.0).abs() < 1e-9);
        assert!(surface.can_undo());
        assert_eq!(*surface.gesture(), GestureState::Idle);
    }

    #[test]
    fn test_tap_commits_single_point() {
        let mut surface = surface();
        let config = pen(2.0, InkColor::BLACK);

        surface.handle(PointerSample::down(5.0, 5.0), &config);
        surface.handle(PointerSample::up(5.0, 5.0), &config);

        assert_eq!(surface.strokes().len(), 1);
        assert_eq!(surface.strokes()[0].points(), &[Point::new(5.0, 5.0)]);
    }

    #[test]
    fn test_width_follows_last_pressure() {
        let mut surface = surface();
        let config = pen(4.0, InkColor::BLACK);

        surface.handle(PointerSample::down(0.0, 0.0).with_pressure(1.0), &config);
        surface.handle(PointerSample::moved(1.0, 0.0).with_pressure(0.0), &config);
        surface.handle(PointerSample::cancel(1.0, 0.0), &config);

        // Cancel keeps the width of the last move: 4 * (0.5 + 0.0).
        assert!((surface.strokes()[0].width() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_up_pressure_sets_committed_width() {
        let mut surface = surface();
        let config = pen(4.0, InkColor::BLACK);

        surface.handle(PointerSample::down(0.0, 0.0).with_pressure(1.0), &config);
        surface.handle(PointerSample::moved(5.0, 0.0).with_pressure(1.0), &config);
        surface.handle(PointerSample::up(5.0, 0.0).with_pressure(0.0), &config);

        // The up sample's own pressure wins over the moves: 4 * (0.5 + 0.0).
        assert!((surface.strokes()[0].width() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_mid_gesture_commits() {
        let mut surface = surface();
        let mut config = pen(2.0, InkColor::BLUE);

        surface.handle(PointerSample::down(0.0, 0.0), &config);
        surface.handle(PointerSample::moved(10.0, 0.0), &config);
        config.toggle_pan();
        let response = surface.handle(PointerSample::moved(20.0, 0.0), &config);

        assert!(!response.consumed);
        assert!(response.changed);
        assert_eq!(*surface.gesture(), GestureState::Idle);
        assert_eq!(surface.strokes().len(), 1);
        // The panning sample is not part of the stroke.
        assert_eq!(
            surface.strokes()[0].points(),
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
        assert!(surface.can_undo());
    }

    #[test]
    fn test_pan_mode_not_consumed() {
        let mut surface = surface();
        let mut config = pen(2.0, InkColor::BLACK);
        config.toggle_pan();

        let response = surface.handle(PointerSample::down(0.0, 0.0), &config);
        assert!(!response.consumed);
        surface.handle(PointerSample::moved(5.0, 5.0), &config);
        surface.handle(PointerSample::up(5.0, 5.0), &config);
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_erase_gesture() {
        let mut surface = surface();
        let config = pen(1.0, InkColor::BLACK);
        surface.handle(PointerSample::down(0.0, 0.0), &config);
        surface.handle(PointerSample::moved(10.0, 10.0), &config);
        surface.handle(PointerSample::up(10.0, 10.0), &config);
        surface.handle(PointerSample::down(0.0, 80.0), &config);
        surface.handle(PointerSample::moved(10.0, 80.0), &config);
        surface.handle(PointerSample::up(10.0, 80.0), &config);
        assert_eq!(surface.strokes().len(), 2);

        let mut eraser = config.clone();
        eraser.select_eraser();

        // Down far away removes nothing; the move crosses the first stroke.
        let down = surface.handle(PointerSample::down(50.0, 50.0), &eraser);
        assert!(down.consumed && !down.changed);
        let moved = surface.handle(PointerSample::moved(5.0, 5.0), &eraser);
        assert!(moved.changed);
        surface.handle(PointerSample::up(5.0, 5.0), &eraser);

        assert_eq!(surface.strokes().len(), 1);
        assert_eq!(surface.strokes()[0].points()[0], Point::new(0.0, 80.0));

        assert!(surface.undo());
        assert_eq!(surface.strokes().len(), 2);
    }

    #[test]
    fn test_display_scale_divided_out() {
        let mut surface = CaptureSurface::new(
            PageView::fit_width(Size::new(100.0, 200.0), 200.0),
            Eraser::default(),
        );
        let config = pen(4.0, InkColor::BLUE);

        surface.handle(PointerSample::down(20.0, 40.0), &config);
        surface.handle(PointerSample::moved(60.0, 80.0), &config);
        surface.handle(PointerSample::up(60.0, 80.0), &config);

        let stroke = &surface.strokes()[0];
        assert_eq!(stroke.points(), &[Point::new(10.0, 20.0), Point::new(30.0, 40.0)]);
        // 4 * 2.0 display pixels at scale 2.
        assert!((stroke.width() - 4.0).abs() < 1e-9);

        let commands = surface.draw_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].points, vec![Point::new(20.0, 40.0), Point::new(60.0, 80.0)]);
        assert!((commands[0].width - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_live_stroke_in_draw_commands() {
        let mut surface = surface();
        let config = pen(2.0, InkColor::GREEN);
        surface.handle(PointerSample::down(1.0, 1.0), &config);
        surface.handle(PointerSample::moved(2.0, 2.0), &config);

        let commands = surface.draw_commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].live);
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_take_layer_commits_live_stroke() {
        let mut surface = surface();
        let config = pen(2.0, InkColor::GREEN);
        surface.handle(PointerSample::down(1.0, 1.0), &config);

        let layer = surface.take_layer();
        assert_eq!(layer.store().len(), 1);
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_clear_is_undoable() {
        let mut surface = surface();
        let config = pen(2.0, InkColor::GREEN);
        for x in [1.0, 20.0, 40.0] {
            surface.handle(PointerSample::down(x, 1.0), &config);
            surface.handle(PointerSample::up(x, 1.0), &config);
        }

        assert!(surface.clear());
        assert!(surface.strokes().is_empty());
        assert!(surface.undo());
        assert_eq!(surface.strokes().len(), 3);
    }
}
