//! Minimal PDF output: one full-page RGB image per page.

use image::RgbaImage;
use inkpage_core::{InkError, InkResult};
use inkpage_render::{DEFAULT_EXPORT_SCALE, DocumentWriter};
use lopdf::content::{Content, Operation};
use lopdf::xref::XrefType;
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Write;

/// A finished page waiting to be serialized.
#[derive(Debug, Clone)]
struct PdfPage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

/// Writes pages as uncompressed image XObjects in a PDF 1.4 file.
#[derive(Debug)]
pub struct RasterPdfWriter {
    /// PDF points per bitmap pixel.
    points_per_pixel: f64,
    pages: Vec<PdfPage>,
    closed: bool,
}

impl Default for RasterPdfWriter {
    fn default() -> Self {
        Self::for_export_scale(DEFAULT_EXPORT_SCALE)
    }
}

impl RasterPdfWriter {
    /// Size pages so one page unit is one PDF point when bitmaps are
    /// rendered at `scale` pixels per page unit.
    pub fn for_export_scale(scale: f64) -> Self {
        let points_per_pixel = if scale.is_finite() && scale > 0.0 {
            1.0 / scale
        } else {
            1.0 / DEFAULT_EXPORT_SCALE
        };
        Self {
            points_per_pixel,
            pages: Vec::new(),
            closed: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn ensure_open(&self) -> InkResult<()> {
        if self.closed {
            Err(InkError::WriteFailure("writer is closed".to_string()))
        } else {
            Ok(())
        }
    }

    /// Build the document: one page per finished bitmap, each page drawing a
    /// single image XObject scaled to its media box.
    fn encode(&self) -> InkResult<Document> {
        let mut doc = Document::with_version("1.4");
        doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
        let id_pages = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let w = (f64::from(page.width) * self.points_per_pixel) as f32;
            let h = (f64::from(page.height) * self.points_per_pixel) as f32;

            let id_image = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(page.width),
                    "Height" => i64::from(page.height),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                page.rgb.clone(),
            ));

            let content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                    ),
                    Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                    Operation::new("Q", vec![]),
                ],
            };
            let bytes = content
                .encode()
                .map_err(|e| InkError::WriteFailure(format!("content stream: {e}")))?;
            let id_content = doc.add_object(Stream::new(dictionary! {}, bytes));

            let id_page = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => id_pages,
                "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
                "Resources" => dictionary! {
                    "XObject" => dictionary! {
                        "Im0" => id_image,
                    },
                },
                "Contents" => id_content,
            });
            kids.push(id_page.into());
        }

        doc.set_object(
            id_pages,
            dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            },
        );
        let id_catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => id_pages,
        });
        doc.trailer.set("Root", id_catalog);
        Ok(doc)
    }
}

/// Drop alpha, compositing over white.
fn flatten_rgb(bitmap: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bitmap.as_raw().len() / 4 * 3);
    for px in bitmap.pixels() {
        let [r, g, b, a] = px.0;
        let a = u16::from(a);
        for c in [r, g, b] {
            let blended = (u16::from(c) * a + 255 * (255 - a) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

impl DocumentWriter for RasterPdfWriter {
    type Canvas = RgbaImage;

    fn start_page(&mut self, width: u32, height: u32) -> InkResult<RgbaImage> {
        self.ensure_open()?;
        Ok(RgbaImage::new(width, height))
    }

    fn draw_bitmap(
        &mut self,
        canvas: &mut RgbaImage,
        bitmap: &RgbaImage,
        origin: (u32, u32),
    ) -> InkResult<()> {
        self.ensure_open()?;
        image::imageops::overlay(canvas, bitmap, i64::from(origin.0), i64::from(origin.1));
        Ok(())
    }

    fn finish_page(&mut self, canvas: RgbaImage) -> InkResult<()> {
        self.ensure_open()?;
        self.pages.push(PdfPage {
            width: canvas.width(),
            height: canvas.height(),
            rgb: flatten_rgb(&canvas),
        });
        Ok(())
    }

    fn write_to(&mut self, sink: &mut dyn Write) -> InkResult<()> {
        self.ensure_open()?;
        if self.pages.is_empty() {
            return Err(InkError::WriteFailure("no pages to write".to_string()));
        }
        let mut doc = self.encode()?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| InkError::WriteFailure(format!("pdf serialization: {e}")))?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        self.pages.clear();
        self.closed = true;
    }
}
