//! InkPage Core Library
//!
//! Platform-agnostic annotation model for multi-page documents: strokes,
//! undo history, the eraser, per-page storage and the capture surface.

pub mod config;
pub mod eraser;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod registry;
pub mod session;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod view;

pub use config::{HostConfig, InputMode, pressure_width};
pub use eraser::{Eraser, EraserConfig};
pub use error::{InkError, InkResult};
pub use history::{EditOp, History, PageLayer};
pub use input::{PointerPhase, PointerSample};
pub use registry::PageRegistry;
pub use session::AnnotationSession;
pub use store::StrokeStore;
pub use stroke::{InkColor, LiveStroke, PALETTE, Stroke, StrokeId, palette_color};
pub use surface::{CaptureSurface, DrawCommand, GestureState, SurfaceResponse};
pub use view::PageView;
