//! Companion plot of a curvature series.
//!
//! The runner hands the endpoint-padded series to a [`CurvaturePlotter`]
//! after the text output is written. [`PngPlotter`] draws index against
//! curvature; NaN values leave gaps.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use pathcurve_common::config::PlotSettings;
use pathcurve_common::error::{CurveError, CurveResult};

const MARGIN: u32 = 40;
const GRID_DIVISIONS: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 230]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const SERIES: Rgb<u8> = Rgb([31, 119, 180]);

/// Renders a curvature series to an image file.
pub trait CurvaturePlotter: Send + Sync {
    fn plot(&self, series: &[f64], target: &Path) -> CurveResult<()>;
}

/// Plotter that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlot;

impl CurvaturePlotter for NoPlot {
    fn plot(&self, _series: &[f64], _target: &Path) -> CurveResult<()> {
        Ok(())
    }
}

/// Line chart written as PNG.
#[derive(Debug, Clone, Copy)]
pub struct PngPlotter {
    width: u32,
    height: u32,
}

impl PngPlotter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(2 * MARGIN + 10),
            height: height.max(2 * MARGIN + 10),
        }
    }

    pub fn from_settings(settings: &PlotSettings) -> Self {
        Self::new(settings.width, settings.height)
    }

    /// Draw the chart in memory.
    pub fn render(&self, series: &[f64]) -> RgbImage {
        let mut img = ImageBuffer::from_pixel(self.width, self.height, BACKGROUND);

        let left = MARGIN as f32;
        let top = MARGIN as f32;
        let right = (self.width - MARGIN) as f32;
        let bottom = (self.height - MARGIN) as f32;

        for step in 0..=GRID_DIVISIONS {
            let t = step as f32 / GRID_DIVISIONS as f32;
            let x = left + (right - left) * t;
            let y = top + (bottom - top) * t;
            draw_line_segment_mut(&mut img, (x, top), (x, bottom), GRID);
            draw_line_segment_mut(&mut img, (left, y), (right, y), GRID);
        }
        draw_line_segment_mut(&mut img, (left, bottom), (right, bottom), AXIS);
        draw_line_segment_mut(&mut img, (left, top), (left, bottom), AXIS);

        let (lo, hi) = value_range(series);
        let span_x = series.len().saturating_sub(1).max(1) as f32;
        let to_canvas = |i: usize, v: f64| -> (f32, f32) {
            let x = left + (right - left) * (i as f32 / span_x);
            let t = ((v - lo) / (hi - lo)) as f32;
            (x, bottom - (bottom - top) * t)
        };

        let mut previous: Option<(f32, f32)> = None;
        for (i, &v) in series.iter().enumerate() {
            if !v.is_finite() {
                previous = None;
                continue;
            }
            let current = to_canvas(i, v);
            if let Some(prev) = previous {
                draw_line_segment_mut(&mut img, prev, current, SERIES);
            }
            draw_filled_circle_mut(
                &mut img,
                (current.0.round() as i32, current.1.round() as i32),
                2,
                SERIES,
            );
            previous = Some(current);
        }

        img
    }
}

impl CurvaturePlotter for PngPlotter {
    fn plot(&self, series: &[f64], target: &Path) -> CurveResult<()> {
        self.render(series)
            .save(target)
            .map_err(|e| CurveError::plot(format!("failed to save {}: {e}", target.display())))
    }
}

/// Vertical range covering zero and every finite value, never empty.
fn value_range(series: &[f64]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo <= f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}
