//! Chart geometry: pie slices and horizontal bars as plain data.
//!
//! Angles are in degrees, counter-clockwise from the positive x axis.
//! Coordinates are millimetres with y pointing up, as in PDF user space.

use feedback_core::LabelShare;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

pub const BLACK: Rgb8 = Rgb8::new(0x00, 0x00, 0x00);
pub const WHITE: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);
pub const AXIS: Rgb8 = Rgb8::new(0x44, 0x44, 0x44);

/// Pie slice fills, assigned by slice position and cycled.
pub const PIE_PALETTE: [Rgb8; 3] = [
    Rgb8::new(0xd4, 0xed, 0xda),
    Rgb8::new(0xf8, 0xd7, 0xda),
    Rgb8::new(0xff, 0xf3, 0xcd),
];

pub const BAR_FILL: Rgb8 = Rgb8::new(0xf5, 0xc6, 0xcb);

/// First slice starts at twelve o'clock.
const PIE_START_DEG: f64 = 90.0;

/// Arc resolution for slice outlines.
const MAX_ARC_STEP_DEG: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub percent: f64,
    pub start_deg: f64,
    pub sweep_deg: f64,
    pub color: Rgb8,
}

impl PieSlice {
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

/// Lay out one slice per share, proportional to its count.
pub fn pie_slices(shares: &[LabelShare]) -> Vec<PieSlice> {
    let total: usize = shares.iter().map(|s| s.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = PIE_START_DEG;
    shares
        .iter()
        .enumerate()
        .map(|(idx, share)| {
            let sweep = 360.0 * share.count as f64 / total as f64;
            let slice = PieSlice {
                label: share.label.clone(),
                percent: share.percent,
                start_deg: start,
                sweep_deg: sweep,
                color: PIE_PALETTE[idx % PIE_PALETTE.len()],
            };
            start += sweep;
            slice
        })
        .collect()
}

pub fn point_on_circle(cx: f64, cy: f64, radius: f64, deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// Closed outline of a slice: the centre followed by points along the arc.
pub fn wedge_outline(cx: f64, cy: f64, radius: f64, start_deg: f64, sweep_deg: f64) -> Vec<(f64, f64)> {
    let steps = (sweep_deg.abs() / MAX_ARC_STEP_DEG).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((cx, cy));
    for i in 0..=steps {
        let deg = start_deg + sweep_deg * i as f64 / steps as f64;
        points.push(point_on_circle(cx, cy, radius, deg));
    }
    points
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRow {
    pub label: String,
    pub count: usize,
}

/// Bars sorted by ascending count; the last row is the largest and is
/// drawn at the top.
pub fn bar_rows(shares: &[LabelShare]) -> Vec<BarRow> {
    let mut rows: Vec<BarRow> = shares
        .iter()
        .rev()
        .map(|s| BarRow {
            label: s.label.clone(),
            count: s.count,
        })
        .collect();
    rows.sort_by_key(|r| r.count);
    rows
}

/// Integer tick positions from zero up to at least `max`, at most six ticks.
pub fn axis_ticks(max: usize) -> Vec<usize> {
    let max = max.max(1);
    let step = max.div_ceil(5);
    let last = max.div_ceil(step) * step;
    (0..=last).step_by(step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(label: &str, count: usize, percent: f64) -> LabelShare {
        LabelShare {
            label: label.to_string(),
            count,
            percent,
        }
    }

    #[test]
    fn slices_cover_full_circle_from_twelve_oclock() {
        let slices = pie_slices(&[
            share("Positive", 2, 50.0),
            share("Negative", 1, 25.0),
            share("Neutral", 1, 25.0),
        ]);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start_deg, 90.0);
        assert_eq!(slices[0].sweep_deg, 180.0);
        assert_eq!(slices[1].start_deg, 270.0);
        let end = slices[2].start_deg + slices[2].sweep_deg;
        assert!((end - 450.0).abs() < 1e-9);
    }

    #[test]
    fn palette_cycles_by_position() {
        let shares: Vec<_> = (0..4).map(|i| share(&format!("L{i}"), 1, 25.0)).collect();
        let slices = pie_slices(&shares);
        assert_eq!(slices[0].color, PIE_PALETTE[0]);
        assert_eq!(slices[3].color, PIE_PALETTE[0]);
        assert_eq!(slices[2].color, PIE_PALETTE[2]);
    }

    #[test]
    fn no_shares_no_slices() {
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn wedge_starts_at_centre_and_ends_on_arc() {
        let points = wedge_outline(0.0, 0.0, 10.0, 0.0, 90.0);
        assert_eq!(points[0], (0.0, 0.0));
        let (x, y) = points[1];
        assert!((x - 10.0).abs() < 1e-9 && y.abs() < 1e-9);
        let (x, y) = *points.last().unwrap();
        assert!(x.abs() < 1e-9 && (y - 10.0).abs() < 1e-9);
        assert_eq!(points.len(), 32);
    }

    #[test]
    fn bars_ascend_with_largest_last() {
        let rows = bar_rows(&[
            share("Billing/Pricing", 3, 50.0),
            share("Car Condition", 2, 33.3),
            share("Staff Interaction", 1, 16.7),
        ]);
        let counts: Vec<usize> = rows.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![1, 2, 3]);
        assert_eq!(rows[2].label, "Billing/Pricing");
    }

    #[test]
    fn ticks_reach_past_the_maximum() {
        assert_eq!(axis_ticks(0), vec![0, 1]);
        assert_eq!(axis_ticks(3), vec![0, 1, 2, 3]);
        assert_eq!(axis_ticks(7), vec![0, 2, 4, 6, 8]);
        assert_eq!(axis_ticks(23), vec![0, 5, 10, 15, 20, 25]);
    }

    #[test]
    fn unit_colour_components() {
        assert_eq!(WHITE.unit(), (1.0, 1.0, 1.0));
        assert_eq!(BLACK.unit(), (0.0, 0.0, 0.0));
    }
}
