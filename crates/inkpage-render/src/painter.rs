//! Stroke painting with tiny-skia.

use image::{Pixel, Rgba, RgbaImage};
use inkpage_core::{DrawCommand, InkColor, Stroke};
use kurbo::{Affine, Point, Size};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

/// Paint onto `img` through a tiny-skia pixmap.
///
/// `f` draws on a transparent layer; the layer is demultiplied and composited
/// over `img` with source-over, so `img` stays straight (unpremultiplied)
/// RGBA and pixels `f` leaves untouched are unchanged. Returns `false`
/// (leaving `img` untouched) for zero-sized images.
pub fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) -> bool {
    let (w, h) = (img.width(), img.height());
    let Some(mut pixmap) = Pixmap::new(w, h) else {
        return false;
    };

    f(&mut pixmap);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        if src.alpha() == 0 {
            continue;
        }
        let c = src.demultiply();
        dst.blend(&Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
    }
    true
}

/// Convert a kurbo transform to tiny-skia's layout.
pub fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Page space to bitmap pixels for a page rendered at `width` x `height`.
pub fn page_transform(page_size: Size, width: u32, height: u32) -> Affine {
    if page_size.width <= 0.0 || page_size.height <= 0.0 {
        return Affine::IDENTITY;
    }
    Affine::scale_non_uniform(
        f64::from(width) / page_size.width,
        f64::from(height) / page_size.height,
    )
}

fn paint_for(color: InkColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Paint one polyline. Points and width are in the space `transform` maps
/// from, so a non-uniform transform stretches the pen too.
fn paint_polyline(
    pixmap: &mut Pixmap,
    points: &[Point],
    color: InkColor,
    width: f64,
    transform: Transform,
) {
    let Some(first) = points.first() else {
        return;
    };
    let paint = paint_for(color);

    // A tap is a round dot the size of the pen.
    if points.iter().all(|p| p == first) {
        let radius = (width / 2.0) as f32;
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, radius) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = tiny_skia::Stroke {
        width: width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}

/// Paint committed strokes, back to front, through `transform`.
pub fn paint_strokes<'a>(
    pixmap: &mut Pixmap,
    strokes: impl IntoIterator<Item = &'a Stroke>,
    transform: Affine,
) {
    let transform = to_skia_transform(transform);
    for stroke in strokes {
        paint_polyline(pixmap, stroke.points(), stroke.color(), stroke.width(), transform);
    }
}

/// Paint display-space draw commands (on-screen rendering).
pub fn paint_commands(pixmap: &mut Pixmap, commands: &[DrawCommand]) {
    for command in commands {
        paint_polyline(
            pixmap,
            &command.points,
            command.color,
            command.width,
            Transform::identity(),
        );
    }
}
