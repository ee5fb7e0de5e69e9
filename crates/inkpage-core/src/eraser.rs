//! Whole-stroke eraser.

use crate::geometry::{self, DEFAULT_SAMPLE_STEP};
use crate::history::{EditOp, PageLayer};
use crate::stroke::Stroke;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default factor applied to the eraser radius before hit-testing.
pub const DEFAULT_RADIUS_MULTIPLIER: f64 = 3.0;

/// Eraser tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraserConfig {
    /// Multiplier applied to the effective radius.
    pub radius_multiplier: f64,
    /// Arc-length spacing of the samples tested against the pointer.
    pub sample_step: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            radius_multiplier: DEFAULT_RADIUS_MULTIPLIER,
            sample_step: DEFAULT_SAMPLE_STEP,
        }
    }
}

/// Finds and removes strokes near a pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Eraser {
    pub config: EraserConfig,
}

impl Eraser {
    pub fn new(config: EraserConfig) -> Self {
        Self { config }
    }

    /// Distance within which a sample marks its stroke for removal.
    pub fn reach(&self, radius: f64) -> f64 {
        radius * self.config.radius_multiplier
    }

    /// Whether `stroke` would be erased by a touch at `point`.
    pub fn hits(&self, stroke: &Stroke, point: Point, radius: f64) -> bool {
        geometry::within_distance(
            stroke.points(),
            point,
            self.config.sample_step,
            self.reach(radius),
        )
    }

    /// Indices of every stroke hit at `point`, front to back.
    pub fn hit_indices(&self, layer: &PageLayer, point: Point, radius: f64) -> Vec<usize> {
        layer
            .store()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, stroke)| self.hits(stroke, point, radius))
            .map(|(index, _)| index)
            .collect()
    }

    /// Remove every stroke hit at `point`, each as its own undoable edit.
    ///
    /// Strokes are removed from the top of the z-order downward so every
    /// recorded index is the stroke's position at the moment it was removed.
    /// Returns the removed strokes in removal order.
    pub fn erase_at(&self, layer: &mut PageLayer, point: Point, radius: f64) -> Vec<Stroke> {
        let hits = self.hit_indices(layer, point, radius);
        let mut removed = Vec::with_capacity(hits.len());

        for index in hits {
            if let Some(stroke) = layer.store().get(index).cloned() {
                layer.record(EditOp::RemoveStroke {
                    index,
                    stroke: stroke.clone(),
                });
                removed.push(stroke);
            }
        }

        if !removed.is_empty() {
            log::debug!("Erased {} stroke(s) at ({:.1}, {:.1})", removed.len(), point.x, point.y);
        }
        removed
    }
}
