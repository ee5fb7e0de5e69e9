//! Ink strokes and their colors.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

/// Serializable ink color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl InkColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const ORANGE: Self = Self::rgb(0xFF, 0x98, 0x00);
    pub const PURPLE: Self = Self::rgb(0x9C, 0x27, 0xB0);
    pub const PINK: Self = Self::rgb(0xE9, 0x1E, 0x63);
    pub const BROWN: Self = Self::rgb(0x79, 0x55, 0x48);
    pub const GRAY: Self = Self::rgb(0x88, 0x88, 0x88);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for InkColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for InkColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<InkColor> for Color {
    fn from(color: InkColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// The pen colors offered by the color picker, in display order.
pub const PALETTE: [(&str, InkColor); 12] = [
    ("black", InkColor::BLACK),
    ("red", InkColor::RED),
    ("blue", InkColor::BLUE),
    ("green", InkColor::GREEN),
    ("yellow", InkColor::YELLOW),
    ("orange", InkColor::ORANGE),
    ("purple", InkColor::PURPLE),
    ("pink", InkColor::PINK),
    ("brown", InkColor::BROWN),
    ("gray", InkColor::GRAY),
    ("cyan", InkColor::CYAN),
    ("white", InkColor::WHITE),
];

/// Look up a palette color by name (case-insensitive).
pub fn palette_color(name: &str) -> Option<InkColor> {
    PALETTE
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, c)| *c)
}

/// A committed freehand ink path.
///
/// Color and width are fixed for the whole stroke. Once built, a stroke is
/// never edited in place; the eraser removes it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<Point>,
    color: InkColor,
    width: f64,
}

impl Stroke {
    /// Create a stroke. `points` should not be empty; a single point is a tap.
    pub fn new(points: Vec<Point>, color: InkColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// A tap with no movement.
    pub fn is_dot(&self) -> bool {
        match self.points.as_slice() {
            [] | [_] => true,
            [first, rest @ ..] => rest.iter().all(|p| p == first),
        }
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Polyline path through the stroke's points.
    pub fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }

    /// A copy of this stroke mapped through `affine`, with the width scaled by
    /// the transform's uniform scale. The copy keeps the same id.
    pub fn transformed(&self, affine: Affine) -> Self {
        Self {
            id: self.id,
            points: self.points.iter().map(|p| affine * *p).collect(),
            color: self.color,
            width: self.width * uniform_scale(affine),
        }
    }
}

/// Geometric mean of the transform's axis scales.
pub(crate) fn uniform_scale(affine: Affine) -> f64 {
    affine.determinant().abs().sqrt()
}

/// Build a polyline path; a single point becomes a zero-length segment.
pub fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    if points.len() == 1 {
        path.line_to(*first);
    }
    for point in points.iter().skip(1) {
        path.line_to(*point);
    }
    path
}

/// A stroke still being drawn.
///
/// Unlike a committed [`Stroke`], the width follows the latest pressure
/// sample; whatever it is when the gesture ends is what gets committed.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStroke {
    points: Vec<Point>,
    color: InkColor,
    width: f64,
}

impl LiveStroke {
    /// Start a stroke at `start`.
    pub fn begin(start: Point, color: InkColor, width: f64) -> Self {
        Self {
            points: vec![start],
            color,
            width,
        }
    }

    pub fn add_point(&mut self, point: Point, width: f64) {
        self.points.push(point);
        self.width = width;
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Freeze into a committed stroke.
    pub fn commit(self) -> Stroke {
        Stroke::new(self.points, self.color, self.width)
    }
}
