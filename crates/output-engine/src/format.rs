//! Text rendering of curvature results.
//!
//! Two line shapes are supported:
//! - curvature only: `NaN` / `0.0` / `1.4142135624` (rounded, plain decimal)
//! - point + aux + curvature: `x,y,yaw,0.0000000000000000` (fixed point)
//!
//! Neither shape ever uses exponential notation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pathcurve_common::config::{OutputSettings, OutputShape};
use pathcurve_common::error::{CurveError, CurveResult};
use pathcurve_path_model::sequence::PointSequence;

/// Renders a point sequence and its aligned curvature values.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    settings: OutputSettings,
}

impl OutputFormatter {
    pub fn new(settings: OutputSettings) -> Self {
        Self { settings }
    }

    /// Render the full file contents.
    ///
    /// `curvature` must hold one value per point (endpoint-padded).
    pub fn render(&self, sequence: &PointSequence, curvature: &[f64]) -> CurveResult<String> {
        if curvature.len() != sequence.len() {
            return Err(CurveError::Other(anyhow::anyhow!(
                "curvature series has {} values for {} points",
                curvature.len(),
                sequence.len()
            )));
        }

        let mut out = String::new();
        match self.settings.shape {
            OutputShape::CurvatureOnly => {
                for &k in curvature {
                    out.push_str(&plain_decimal(k, self.settings.decimals));
                    out.push('\n');
                }
            }
            OutputShape::PointAuxCurvature => {
                let delim = self.settings.delimiter.as_str();
                let aux = sequence.aux();
                for (i, (point, &k)) in sequence.points().iter().zip(curvature).enumerate() {
                    let mut fields = vec![shortest_decimal(point.x), shortest_decimal(point.y)];
                    if let Some(aux) = aux {
                        fields.push(shortest_decimal(aux[i]));
                    }
                    fields.push(fixed_point(k, self.settings.decimals));
                    out.push_str(&fields.join(delim));
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    /// Render and write to `path`, replacing any file that is still there.
    ///
    /// Backup rotation must already have run for `path`.
    pub fn write(&self, path: &Path, sequence: &PointSequence, curvature: &[f64]) -> CurveResult<()> {
        let content = self.render(sequence, curvature)?;

        let file = File::create(path).map_err(|e| CurveError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| CurveError::io(path, e))?;
        Ok(())
    }
}

/// Round half away from zero to `decimals` places.
///
/// Values whose scaled magnitude leaves the exactly-representable range are
/// returned unchanged.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return value;
    }
    scaled.round() / factor
}

/// Rounded value as the shortest plain decimal string, always with a `.`.
///
/// Never shows more than `decimals` digits after the point, including for
/// magnitudes [`round_to`] cannot round exactly.
pub fn plain_decimal(value: f64, decimals: usize) -> String {
    let scaled = value * 10f64.powi(decimals as i32);
    if value.is_finite() && scaled.abs() >= 2f64.powi(52) {
        return trim_fraction(fixed_point(value, decimals));
    }
    shortest_decimal(round_to(value, decimals))
}

/// Drop trailing fractional zeros, keeping at least one digit after the point.
fn trim_fraction(mut s: String) -> String {
    if !s.contains('.') {
        s.push_str(".0");
        return s;
    }
    let kept = s.trim_end_matches('0').len();
    s.truncate(kept);
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

/// Fixed-point rendering with exactly `decimals` digits after the point.
pub fn fixed_point(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

/// Shortest round-tripping decimal representation, e.g. `2.0`, `0.5`, `NaN`.
pub fn shortest_decimal(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    let mut s = value.to_string();
    if value.is_finite() && !s.contains('.') {
        s.push_str(".0");
    }
    s
}
