//! Page layout: turns report content into per-page drawing operations.
//!
//! Layout knows nothing about PDF encoding; `pdf` replays the operations.
//! Every page carries the report title as header and `Page N` as footer.

use crate::chart::{
    axis_ticks, point_on_circle, wedge_outline, BarRow, PieSlice, Rgb8, AXIS, BAR_FILL, WHITE,
};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 10.0;
pub const CONTENT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

pub const REPORT_TITLE: &str = "Car Rental Feedback Analysis Report";

const PT_TO_MM: f64 = 25.4 / 72.0;
/// Mean Helvetica advance width, as a fraction of the font size.
const AVG_GLYPH_EM: f64 = 0.5;

const CONTENT_TOP_MM: f64 = 35.0;
const CONTENT_BOTTOM_MM: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline starting at `(x, y)`.
    Text {
        text: String,
        size: f64,
        x: f64,
        y: f64,
        style: FontStyle,
    },
    /// Filled closed polygon.
    Shape {
        points: Vec<(f64, f64)>,
        fill: Rgb8,
        outline: Option<Rgb8>,
    },
    /// Open polyline.
    Stroke { points: Vec<(f64, f64)>, color: Rgb8 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// All text on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Estimated rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * PT_TO_MM * AVG_GLYPH_EM
}

/// Greedy word wrap. Explicit newlines are kept; words longer than a line
/// are split.
pub fn wrap_text(text: &str, max_width_mm: f64, size_pt: f64) -> Vec<String> {
    let max_chars = ((max_width_mm / (size_pt * PT_TO_MM * AVG_GLYPH_EM)).floor() as usize).max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, max_chars, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_chars: usize, lines: &mut Vec<String>) {
    let mut line = String::new();
    let mut len = 0usize;
    for word in paragraph.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars) {
            if len > 0 && len + 1 + piece.len() > max_chars {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(piece);
            len += piece.len();
        }
    }
    lines.push(line);
}

fn truncate_to_width(text: &str, max_width_mm: f64, size_pt: f64) -> String {
    if text_width_mm(text, size_pt) <= max_width_mm {
        return text.to_string();
    }
    let keep = ((max_width_mm / (size_pt * PT_TO_MM * AVG_GLYPH_EM)) as usize).saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn text_at(text: &str, size: f64, x: f64, y: f64, style: FontStyle) -> DrawOp {
    DrawOp::Text {
        text: text.to_string(),
        size,
        x,
        y,
        style,
    }
}

fn centered(text: &str, size: f64, centre_x: f64, y: f64, style: FontStyle) -> DrawOp {
    text_at(text, size, centre_x - text_width_mm(text, size) / 2.0, y, style)
}

/// Top-to-bottom flow layout across A4 portrait pages.
#[derive(Debug)]
pub struct Layout {
    pages: Vec<PageLayout>,
    cursor: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        let mut layout = Self {
            pages: Vec::new(),
            cursor: 0.0,
        };
        layout.start_page();
        layout
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn into_pages(self) -> Vec<PageLayout> {
        self.pages
    }

    fn start_page(&mut self) {
        let number = self.pages.len() + 1;
        let centre = PAGE_WIDTH_MM / 2.0;
        let mut page = PageLayout::default();
        page.ops.push(centered(
            REPORT_TITLE,
            15.0,
            centre,
            PAGE_HEIGHT_MM - 20.0,
            FontStyle::Bold,
        ));
        page.ops.push(centered(
            &format!("Page {number}"),
            8.0,
            centre,
            10.0,
            FontStyle::Italic,
        ));
        self.pages.push(page);
        self.cursor = PAGE_HEIGHT_MM - CONTENT_TOP_MM;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn ensure_space(&mut self, height: f64) {
        if self.cursor - height < CONTENT_BOTTOM_MM {
            self.start_page();
        }
    }

    pub fn gap(&mut self, height: f64) {
        self.cursor -= height;
    }

    /// Bold section heading.
    pub fn heading(&mut self, text: &str) {
        self.line(text, 12.0, 10.0, FontStyle::Bold);
    }

    /// Wrapped body text, breaking onto new pages as needed.
    pub fn paragraph(&mut self, text: &str, size: f64, line_height: f64) {
        for line in wrap_text(text, CONTENT_WIDTH_MM, size) {
            self.line(&line, size, line_height, FontStyle::Regular);
        }
    }

    fn line(&mut self, text: &str, size: f64, line_height: f64, style: FontStyle) {
        self.ensure_space(line_height);
        let baseline = self.cursor - line_height * 0.7;
        if !text.is_empty() {
            self.push(text_at(text, size, MARGIN_MM, baseline, style));
        }
        self.cursor -= line_height;
    }

    /// Titled pie chart with a percentage inside each slice and the label
    /// outside it.
    pub fn pie_chart(&mut self, title: &str, slices: &[PieSlice]) {
        const HEIGHT: f64 = 95.0;
        const RADIUS: f64 = 32.0;

        self.ensure_space(HEIGHT);
        let top = self.cursor;
        let cx = PAGE_WIDTH_MM / 2.0;
        let cy = top - 20.0 - RADIUS;
        self.push(centered(title, 12.0, cx, top - 6.0, FontStyle::Bold));

        for slice in slices {
            self.push(DrawOp::Shape {
                points: wedge_outline(cx, cy, RADIUS, slice.start_deg, slice.sweep_deg),
                fill: slice.color,
                outline: Some(WHITE),
            });
        }
        for slice in slices {
            let mid = slice.mid_deg();

            let percent = format!("{:.1}%", slice.percent);
            let (px, py) = point_on_circle(cx, cy, RADIUS * 0.6, mid);
            self.push(centered(&percent, 9.0, px, py - 1.0, FontStyle::Regular));

            let (lx, ly) = point_on_circle(cx, cy, RADIUS * 1.15, mid);
            let width = text_width_mm(&slice.label, 10.0);
            let x = if lx < cx { lx - width } else { lx };
            self.push(text_at(&slice.label, 10.0, x, ly - 1.0, FontStyle::Regular));
        }

        self.cursor = top - HEIGHT;
    }

    /// Titled horizontal bar chart; `rows` in ascending order, drawn with
    /// the last row at the top.
    pub fn bar_chart(&mut self, title: &str, axis_label: &str, rows: &[BarRow]) {
        const BAR_HEIGHT: f64 = 7.0;
        const BAR_GAP: f64 = 3.0;
        const LABEL_WIDTH: f64 = 62.0;
        const TITLE_HEIGHT: f64 = 10.0;
        const AXIS_HEIGHT: f64 = 16.0;

        let plot_left = MARGIN_MM + LABEL_WIDTH;
        let plot_right = PAGE_WIDTH_MM - MARGIN_MM - 8.0;
        let plot_height = rows.len() as f64 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP;

        self.ensure_space(TITLE_HEIGHT + plot_height + AXIS_HEIGHT);
        let top = self.cursor;
        self.push(centered(
            title,
            12.0,
            (plot_left + plot_right) / 2.0,
            top - 6.0,
            FontStyle::Bold,
        ));

        let plot_top = top - TITLE_HEIGHT;
        let plot_bottom = plot_top - plot_height;
        let ticks = axis_ticks(rows.iter().map(|r| r.count).max().unwrap_or(0));
        let axis_max = ticks.last().copied().unwrap_or(1).max(1) as f64;
        let scale = (plot_right - plot_left) / axis_max;

        for (i, row) in rows.iter().rev().enumerate() {
            let bar_top = plot_top - BAR_GAP - i as f64 * (BAR_HEIGHT + BAR_GAP);
            let bar_bottom = bar_top - BAR_HEIGHT;
            let bar_right = plot_left + row.count as f64 * scale;
            self.push(DrawOp::Shape {
                points: vec![
                    (plot_left, bar_bottom),
                    (bar_right, bar_bottom),
                    (bar_right, bar_top),
                    (plot_left, bar_top),
                ],
                fill: BAR_FILL,
                outline: None,
            });

            let label = truncate_to_width(&row.label, LABEL_WIDTH - 3.0, 9.0);
            let x = plot_left - 2.0 - text_width_mm(&label, 9.0);
            self.push(text_at(&label, 9.0, x, bar_bottom + 2.2, FontStyle::Regular));
        }

        self.push(DrawOp::Stroke {
            points: vec![
                (plot_left, plot_top),
                (plot_left, plot_bottom),
                (plot_right, plot_bottom),
            ],
            color: AXIS,
        });
        for tick in &ticks {
            let x = plot_left + *tick as f64 * scale;
            self.push(DrawOp::Stroke {
                points: vec![(x, plot_bottom), (x, plot_bottom - 1.5)],
                color: AXIS,
            });
            self.push(centered(
                &tick.to_string(),
                8.0,
                x,
                plot_bottom - 5.0,
                FontStyle::Regular,
            ));
        }
        self.push(centered(
            axis_label,
            9.0,
            (plot_left + plot_right) / 2.0,
            plot_bottom - 11.0,
            FontStyle::Regular,
        ));

        self.cursor = plot_bottom - AXIS_HEIGHT;
    }
}
