//! Host-owned drawing configuration.
//!
//! The host UI mutates these values; the capture surface only reads them,
//! once per pointer event.

use crate::stroke::InkColor;
use serde::{Deserialize, Serialize};

/// Smallest selectable pen width.
pub const MIN_PEN_WIDTH: f64 = 1.0;
/// Largest selectable pen width.
pub const MAX_PEN_WIDTH: f64 = 30.0;
/// Pen width when nothing has been chosen yet.
pub const DEFAULT_PEN_WIDTH: f64 = 5.0;

/// What pointer gestures do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Pen,
    Eraser,
    /// Gestures pass through to the host for scrolling.
    Pan,
}

impl InputMode {
    /// Whether gestures in this mode edit the page.
    pub fn edits(self) -> bool {
        !matches!(self, InputMode::Pan)
    }
}

/// Pen and mode settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub mode: InputMode,
    pub pen_color: InkColor,
    pub pen_width: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            mode: InputMode::Pen,
            pen_color: InkColor::BLACK,
            pen_width: DEFAULT_PEN_WIDTH,
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to drawing. Leaves pan mode.
    pub fn select_pen(&mut self) {
        self.mode = InputMode::Pen;
    }

    /// Switch to erasing. Leaves pan mode.
    pub fn select_eraser(&mut self) {
        self.mode = InputMode::Eraser;
    }

    /// Toggle pan mode; turning it off returns to the pen.
    pub fn toggle_pan(&mut self) {
        self.mode = match self.mode {
            InputMode::Pan => InputMode::Pen,
            InputMode::Pen | InputMode::Eraser => InputMode::Pan,
        };
    }

    /// Set the pen width, clamped to the selectable range.
    pub fn set_pen_width(&mut self, width: f64) {
        self.pen_width = if width.is_finite() {
            width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH)
        } else {
            DEFAULT_PEN_WIDTH
        };
    }

    pub fn set_pen_color(&mut self, color: InkColor) {
        self.pen_color = color;
    }

    /// Width for a pointer sample: `pen_width * (0.5 + pressure * 1.5)`.
    ///
    /// Pressure is clamped to `[0, 1]`; missing pressure counts as full.
    pub fn pressure_width(&self, pressure: Option<f64>) -> f64 {
        pressure_width(self.pen_width, pressure)
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Pressure-adjusted width for a base width.
pub fn pressure_width(base_width: f64, pressure: Option<f64>) -> f64 {
    let pressure = match pressure {
        Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
        _ => 1.0,
    };
    base_width * (0.5 + pressure * 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.mode, InputMode::Pen);
        assert_eq!(config.pen_color, InkColor::BLACK);
        assert!((config.pen_width - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pressure_width() {
        assert!((pressure_width(4.0, Some(1.0)) - 8.0).abs() < 1e-9);
        assert!((pressure_width(4.0, Some(0.0)) - 2.0).abs() < 1e-9);
        assert!((pressure_width(4.0, None) - 8.0).abs() < 1e-9);
        // Out-of-range pressure is clamped.
        assert!((pressure_width(4.0, Some(3.0)) - 8.0).abs() < 1e-9);
        assert!((pressure_width(4.0, Some(f64::NAN)) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_switching() {
        let mut config = HostConfig::default();

        config.toggle_pan();
        assert_eq!(config.mode, InputMode::Pan);
        assert!(!config.mode.edits());

        config.toggle_pan();
        assert_eq!(config.mode, InputMode::Pen);

        config.select_eraser();
        config.toggle_pan();
        config.select_pen();
        assert_eq!(config.mode, InputMode::Pen);
    }

    #[test]
    fn test_pen_width_clamped() {
        let mut config = HostConfig::default();
        config.set_pen_width(0.0);
        assert!((config.pen_width - MIN_PEN_WIDTH).abs() < f64::EPSILON);
        config.set_pen_width(100.0);
        assert!((config.pen_width - MAX_PEN_WIDTH).abs() < f64::EPSILON);
        config.set_pen_width(f64::INFINITY);
        assert!((config.pen_width - DEFAULT_PEN_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_partial() {
        let config = HostConfig::from_json(
            r#"{ "mode": "eraser", "pen_color": { "r": 255, "g": 0, "b": 0, "a": 255 } }"#,
        )
        .unwrap();
        assert_eq!(config.mode, InputMode::Eraser);
        assert_eq!(config.pen_color, InkColor::RED);
        assert!((config.pen_width - DEFAULT_PEN_WIDTH).abs() < f64::EPSILON);
    }
}
