//! PDF encoding of laid-out pages via `printpdf`.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::chart::{Rgb8, BLACK};
use crate::error::{ReportError, Result};
use crate::layout::{DrawOp, FontStyle, PageLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self> {
        let load = |font| doc.add_builtin_font(font).map_err(render_error);
        Ok(Self {
            regular: load(BuiltinFont::Helvetica)?,
            bold: load(BuiltinFont::HelveticaBold)?,
            italic: load(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Encode `pages` as a PDF document.
pub fn render_pdf(title: &str, pages: &[PageLayout]) -> Result<Vec<u8>> {
    let width = mm(PAGE_WIDTH_MM);
    let height = mm(PAGE_HEIGHT_MM);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");
    let fonts = Fonts::load(&doc)?;

    for (idx, page) in pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, format!("Page {}", idx + 1));
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, &fonts, page);
    }

    doc.save_to_bytes().map_err(render_error)
}

fn draw_page(layer: &PdfLayerReference, fonts: &Fonts, page: &PageLayout) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                text,
                size,
                x,
                y,
                style,
            } => {
                layer.set_fill_color(color(BLACK));
                layer.use_text(text.as_str(), *size as f32, mm(*x), mm(*y), fonts.get(*style));
            }
            DrawOp::Shape {
                points,
                fill,
                outline,
            } => {
                layer.set_fill_color(color(*fill));
                let mode = match outline {
                    Some(stroke) => {
                        layer.set_outline_color(color(*stroke));
                        layer.set_outline_thickness(0.8);
                        PaintMode::FillStroke
                    }
                    None => PaintMode::Fill,
                };
                layer.add_polygon(Polygon {
                    rings: vec![to_points(points)],
                    mode,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawOp::Stroke { points, color: c } => {
                layer.set_outline_color(color(*c));
                layer.set_outline_thickness(0.6);
                layer.add_line(Line {
                    points: to_points(points),
                    is_closed: false,
                });
            }
        }
    }
}

fn to_points(points: &[(f64, f64)]) -> Vec<(Point, bool)> {
    points
        .iter()
        .map(|&(x, y)| (Point::new(mm(x), mm(y)), false))
        .collect()
}

fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

fn color(rgb: Rgb8) -> Color {
    let (r, g, b) = rgb.unit();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn render_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn single_page_layout_renders_pdf() {
        let mut layout = Layout::new();
        layout.heading("1. Section");
        layout.paragraph("Body text", 11.0, 5.0);
        let bytes = render_pdf("test", &layout.into_pages()).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn multi_page_documents_render() {
        let mut layout = Layout::new();
        for i in 0..150 {
            layout.paragraph(&format!("line {i}"), 11.0, 6.0);
        }
        let pages = layout.into_pages();
        assert!(pages.len() > 1);

        let bytes = render_pdf("test", &pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
