//! Pointer samples delivered by the host's input source.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Where a sample sits in its gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerPhase {
    /// Up and cancel both end a gesture.
    pub fn ends_gesture(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Cancel)
    }
}

/// One pointer sample in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: Point,
    /// Stylus pressure in `[0, 1]`; `None` for devices without pressure.
    #[serde(default)]
    pub pressure: Option<f64>,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pressure: None,
            phase,
        }
    }

    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    pub fn cancel(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Cancel, x, y)
    }

    /// Attach a pressure reading.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }
}
