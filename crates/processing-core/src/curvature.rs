//! Discrete curvature from turning angles.
//!
//! For consecutive segments `i` and `i + 1` of a polyline the estimate at the
//! shared vertex is
//!
//! ```text
//! kappa_i = 2 * sin(theta_i) / d_i
//! ```
//!
//! where `theta_i` is the angle between the two unit tangents and `d_i` is the
//! mean of the two segment lengths. Segment lengths and mean distances below
//! the configured epsilons are clamped up to them, and the tangent dot product
//! is clamped to `[-1, 1]` before `acos`.
//!
//! Every stage returns a fresh vector; caller data is never mutated.

use std::fmt;

use pathcurve_common::config::{CurvatureSettings, EndpointPolicy};
use pathcurve_common::error::CurveResult;
use pathcurve_path_model::point::Point2D;
use pathcurve_path_model::sequence::PointSequence;
use serde::Serialize;

/// Curvature estimator configured with one numerical policy.
#[derive(Debug, Clone)]
pub struct CurvatureEstimator {
    settings: CurvatureSettings,
}

/// Non-fatal anomaly found while estimating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GeometryWarning {
    /// Segments (by index) whose length was clamped to the segment epsilon.
    DegenerateSegments { indices: Vec<usize>, epsilon: f64 },

    /// Interior vertices whose mean distance was clamped to the distance epsilon.
    DegenerateDistances { indices: Vec<usize>, epsilon: f64 },

    /// Interior vertices whose value is non-finite or negative.
    InvalidCurvature { indices: Vec<usize> },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::DegenerateSegments { indices, epsilon } => write!(
                f,
                "{} degenerate segment(s) clamped to {epsilon:e} (first at segment {})",
                indices.len(),
                indices.first().copied().unwrap_or_default()
            ),
            GeometryWarning::DegenerateDistances { indices, epsilon } => write!(
                f,
                "{} degenerate vertex distance(s) clamped to {epsilon:e} (first at vertex {})",
                indices.len(),
                indices.first().map(|i| i + 1).unwrap_or_default()
            ),
            GeometryWarning::InvalidCurvature { indices } => write!(
                f,
                "{} invalid curvature value(s) (non-finite or negative, first at vertex {})",
                indices.len(),
                indices.first().map(|i| i + 1).unwrap_or_default()
            ),
        }
    }
}

/// Interior curvature values and the endpoint policy that pads them.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvatureSeries {
    interior: Vec<f64>,
    endpoint: EndpointPolicy,
}

/// Aggregate figures over the finite interior values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvatureSummary {
    pub count: usize,
    pub finite: usize,
    pub max: f64,
    pub mean: f64,
}

/// Output of one estimation: values plus diagnostics for the caller to log.
#[derive(Debug, Clone)]
pub struct CurvatureEstimate {
    pub series: CurvatureSeries,
    pub warnings: Vec<GeometryWarning>,
}

impl CurvatureEstimator {
    /// Create an estimator with the given thresholds and endpoint policy.
    pub fn new(settings: CurvatureSettings) -> Self {
        Self { settings }
    }

    /// Create an estimator with default settings (1e-10 epsilons, NaN endpoints).
    pub fn with_defaults() -> Self {
        Self::new(CurvatureSettings::default())
    }

    pub fn settings(&self) -> &CurvatureSettings {
        &self.settings
    }

    /// Value every vertex saturates to when all segments are degenerate.
    pub fn saturation_limit(&self) -> f64 {
        2.0 / self
            .settings
            .segment_epsilon
            .max(self.settings.distance_epsilon)
    }

    /// Estimate curvature at every interior vertex of `sequence`.
    ///
    /// Fails only when the sequence has fewer than two points. Two points give
    /// an empty interior series.
    pub fn estimate(&self, sequence: &PointSequence) -> CurveResult<CurvatureEstimate> {
        sequence.ensure_computable()?;

        let mut warnings = Vec::new();
        let points = sequence.points();

        let tangents = tangent_vectors(points);
        let raw_norms: Vec<f64> = tangents.iter().map(Point2D::norm).collect();
        let (norms, clamped) = clamp_below(&raw_norms, self.settings.segment_epsilon);
        if !clamped.is_empty() {
            warnings.push(GeometryWarning::DegenerateSegments {
                indices: clamped,
                epsilon: self.settings.segment_epsilon,
            });
        }

        let units: Vec<Point2D> = tangents
            .iter()
            .zip(&norms)
            .map(|(t, &n)| t.scaled_by_inverse(n))
            .collect();

        let angles: Vec<f64> = units
            .windows(2)
            .map(|pair| turning_angle(&pair[0], &pair[1]))
            .collect();

        let raw_distances: Vec<f64> = norms.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
        let (distances, clamped) = clamp_below(&raw_distances, self.settings.distance_epsilon);
        if !clamped.is_empty() {
            warnings.push(GeometryWarning::DegenerateDistances {
                indices: clamped,
                epsilon: self.settings.distance_epsilon,
            });
        }

        let interior: Vec<f64> = angles
            .iter()
            .zip(&distances)
            .map(|(theta, d)| 2.0 * theta.sin() / d)
            .collect();

        let invalid: Vec<usize> = interior
            .iter()
            .enumerate()
            .filter(|(_, k)| !k.is_finite() || **k < 0.0)
            .map(|(i, _)| i)
            .collect();
        if !invalid.is_empty() {
            warnings.push(GeometryWarning::InvalidCurvature { indices: invalid });
        }

        let interior = match self.settings.endpoint {
            EndpointPolicy::Sentinel => interior,
            EndpointPolicy::ZeroFloor { floor } => zero_floor(&interior, floor),
        };

        Ok(CurvatureEstimate {
            series: CurvatureSeries {
                interior,
                endpoint: self.settings.endpoint,
            },
            warnings,
        })
    }
}

impl CurvatureSeries {
    /// One value per interior vertex (N - 2 values).
    pub fn interior(&self) -> &[f64] {
        &self.interior
    }

    /// Value placed at the first and last point.
    pub fn endpoint_value(&self) -> f64 {
        match self.endpoint {
            EndpointPolicy::Sentinel => f64::NAN,
            EndpointPolicy::ZeroFloor { .. } => 0.0,
        }
    }

    /// Series aligned with the input points (N values).
    pub fn padded(&self) -> Vec<f64> {
        let edge = self.endpoint_value();
        let mut out = Vec::with_capacity(self.interior.len() + 2);
        out.push(edge);
        out.extend_from_slice(&self.interior);
        out.push(edge);
        out
    }

    pub fn summary(&self) -> CurvatureSummary {
        let finite: Vec<f64> = self
            .interior
            .iter()
            .copied()
            .filter(|k| k.is_finite())
            .collect();
        let max = finite.iter().copied().fold(0.0_f64, f64::max);
        let mean = if finite.is_empty() {
            0.0
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };
        CurvatureSummary {
            count: self.interior.len(),
            finite: finite.len(),
            max,
            mean,
        }
    }
}

/// Consecutive point differences (N - 1 vectors).
pub fn tangent_vectors(points: &[Point2D]) -> Vec<Point2D> {
    points.windows(2).map(|pair| pair[0].to(&pair[1])).collect()
}

/// Angle in `[0, pi]` between two (approximately) unit vectors.
///
/// The dot product is clamped into the domain of `acos` first, so rounding
/// that pushes it slightly past +-1 still yields a real angle.
pub fn turning_angle(a: &Point2D, b: &Point2D) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Replace values below `epsilon` by `epsilon`, returning the new values and
/// the indices that were replaced.
fn clamp_below(values: &[f64], epsilon: f64) -> (Vec<f64>, Vec<usize>) {
    let mut replaced = Vec::new();
    let clamped = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if v < epsilon {
                replaced.push(i);
                epsilon
            } else {
                v
            }
        })
        .collect();
    (clamped, replaced)
}

fn zero_floor(values: &[f64], floor: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&k| if k < floor { 0.0 } else { k })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathcurve_common::error::CurveError;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

    fn sequence(points: &[(f64, f64)]) -> PointSequence {
        points.iter().copied().map(Point2D::from).collect()
    }

    fn circle(radius: f64, step: f64, count: usize) -> PointSequence {
        (0..count)
            .map(|i| {
                let a = step * i as f64;
                Point2D::new(radius * a.cos(), radius * a.sin())
            })
            .collect()
    }

    fn zero_floor_estimator(epsilon: f64) -> CurvatureEstimator {
        CurvatureEstimator::new(CurvatureSettings {
            segment_epsilon: epsilon,
            distance_epsilon: epsilon,
            endpoint: EndpointPolicy::ZeroFloor { floor: epsilon },
        })
    }

    #[test]
    fn test_fewer_than_two_points_is_an_error() {
        let estimator = CurvatureEstimator::with_defaults();
        for points in [vec![], vec![(1.0, 2.0)]] {
            let err = estimator.estimate(&sequence(&points)).unwrap_err();
            assert!(matches!(err, CurveError::InsufficientPoints { .. }));
        }
    }

    #[test]
    fn test_two_points_give_only_endpoints() {
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&sequence(&[(0.0, 0.0), (1.0, 0.0)]))
            .unwrap();
        assert!(estimate.series.interior().is_empty());
        let padded = estimate.series.padded();
        assert_eq!(padded.len(), 2);
        assert!(padded.iter().all(|k| k.is_nan()));
    }

    #[test]
    fn test_straight_line_scenario() {
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&sequence(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]))
            .unwrap();
        assert_eq!(estimate.series.interior(), &[0.0]);
        assert!(estimate.warnings.is_empty());

        let padded = estimate.series.padded();
        assert!(padded[0].is_nan());
        assert_eq!(padded[1], 0.0);
        assert!(padded[2].is_nan());
    }

    #[test]
    fn test_unit_circle_quarter_turns() {
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&sequence(&[
                (1.0, 0.0),
                (0.0, 1.0),
                (-1.0, 0.0),
                (0.0, -1.0),
                (1.0, 0.0),
            ]))
            .unwrap();

        // Chords of length sqrt(2) turning by 90 degrees: 2 * sin(pi/2) / sqrt(2).
        let interior = estimate.series.interior();
        assert_eq!(interior.len(), 3);
        for &k in interior {
            assert!((k - SQRT_2).abs() < 1e-9, "k={k}");
            assert!(k > 1.0 && k < 2.0);
        }
    }

    #[test]
    fn test_circle_matches_closed_form() {
        let radius = 4.0;
        let step = 0.05;
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&circle(radius, step, 40))
            .unwrap();

        let expected = 2.0 * (step / 2.0).cos() / radius;
        for &k in estimate.series.interior() {
            assert!((k - expected).abs() / expected < 1e-6, "k={k} expected={expected}");
        }
    }

    #[test]
    fn test_circle_error_shrinks_with_finer_sampling() {
        let radius = 2.0;
        let limit = 2.0 / radius;
        let estimator = CurvatureEstimator::with_defaults();

        let mut previous = f64::INFINITY;
        for step in [0.4, 0.2, 0.1, 0.05] {
            let estimate = estimator.estimate(&circle(radius, step, 12)).unwrap();
            let worst = estimate
                .series
                .interior()
                .iter()
                .map(|k| (k - limit).abs() / limit)
                .fold(0.0_f64, f64::max);
            assert!(worst < previous, "step={step} worst={worst}");
            previous = worst;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&sequence(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 1.0)]))
            .unwrap();
        assert!(estimate
            .series
            .interior()
            .iter()
            .all(|k| k.is_finite() && *k >= 0.0));
        assert!(matches!(
            estimate.warnings.first(),
            Some(GeometryWarning::DegenerateSegments { indices, .. }) if indices == &vec![1]
        ));
    }

    #[test]
    fn test_identical_points_saturate() {
        let estimator = CurvatureEstimator::with_defaults();
        let estimate = estimator
            .estimate(&sequence(&[(3.0, 3.0); 5]))
            .unwrap();

        let limit = estimator.saturation_limit();
        assert_eq!(estimate.series.interior().len(), 3);
        for &k in estimate.series.interior() {
            assert!((k - limit).abs() / limit < 1e-12);
        }
        assert_eq!(estimate.warnings.len(), 1);
    }

    #[test]
    fn test_tiny_distance_is_clamped_and_reported() {
        let estimator = CurvatureEstimator::new(CurvatureSettings {
            segment_epsilon: 1e-12,
            distance_epsilon: 1e-3,
            endpoint: EndpointPolicy::Sentinel,
        });
        let estimate = estimator
            .estimate(&sequence(&[(0.0, 0.0), (1e-4, 0.0), (1e-4, 1e-4)]))
            .unwrap();

        // Right angle over a clamped distance of 1e-3.
        assert!((estimate.series.interior()[0] - 2000.0).abs() < 1e-6);
        assert!(estimate
            .warnings
            .iter()
            .any(|w| matches!(w, GeometryWarning::DegenerateDistances { indices, .. } if indices == &vec![0])));
    }

    #[test]
    fn test_zero_floor_policy() {
        let estimate = zero_floor_estimator(1e-16)
            .estimate(&sequence(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 1.0)]))
            .unwrap();
        let padded = estimate.series.padded();
        assert_eq!(padded.len(), 4);
        assert_eq!(padded[0], 0.0);
        assert_eq!(padded[1], 0.0);
        assert!(padded[2] > 0.0);
        assert_eq!(padded[3], 0.0);
    }

    #[test]
    fn test_zero_floor_clears_values_below_threshold() {
        let estimate = zero_floor_estimator(0.5)
            .estimate(&sequence(&[(0.0, 0.0), (10.0, 0.0), (20.0, 1.0)]))
            .unwrap();
        assert_eq!(estimate.series.interior(), &[0.0]);
    }

    #[test]
    fn test_nan_coordinates_are_reported_invalid() {
        let estimate = CurvatureEstimator::with_defaults()
            .estimate(&sequence(&[(0.0, 0.0), (f64::NAN, 0.0), (2.0, 0.0), (3.0, 0.0)]))
            .unwrap();
        assert!(matches!(
            estimate.warnings.last(),
            Some(GeometryWarning::InvalidCurvature { indices }) if !indices.is_empty()
        ));
        assert_eq!(estimate.series.interior().len(), 2);
    }

    #[test]
    fn test_turning_angle_clamps_domain() {
        let a = Point2D::new(1.0 + 1e-12, 0.0);
        assert_eq!(turning_angle(&a, &a), 0.0);

        let b = Point2D::new(-1.0 - 1e-12, 0.0);
        assert!((turning_angle(&a, &b) - PI).abs() < 1e-12);

        let c = Point2D::new(0.0, 1.0);
        assert!((turning_angle(&a, &c) - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_summary_skips_non_finite() {
        let series = CurvatureSeries {
            interior: vec![1.0, f64::NAN, 3.0],
            endpoint: EndpointPolicy::Sentinel,
        };
        let summary = series.summary();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.finite, 2);
        assert_eq!(summary.max, 3.0);
        assert!((summary.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_warning_display_names_location() {
        let warning = GeometryWarning::DegenerateSegments {
            indices: vec![4, 7],
            epsilon: 1e-10,
        };
        let text = warning.to_string();
        assert!(text.contains("2 degenerate segment(s)"));
        assert!(text.contains("segment 4"));
    }

    proptest! {
        #[test]
        fn prop_collinear_points_have_zero_curvature(
            heading in 0.0f64..(2.0 * PI),
            origin_x in -100.0f64..100.0,
            origin_y in -100.0f64..100.0,
            steps in proptest::collection::vec(0.5f64..10.0, 2..30),
        ) {
            let (dx, dy) = (heading.cos(), heading.sin());
            let mut s = 0.0;
            let mut points = vec![Point2D::new(origin_x, origin_y)];
            for step in &steps {
                s += step;
                points.push(Point2D::new(origin_x + dx * s, origin_y + dy * s));
            }

            let estimate = CurvatureEstimator::with_defaults()
                .estimate(&PointSequence::new(points))
                .unwrap();
            for &k in estimate.series.interior() {
                prop_assert!(k.abs() < 1e-5, "k={}", k);
            }
        }

        #[test]
        fn prop_values_are_finite_and_non_negative(
            coords in proptest::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 2..40),
            duplicate in 0usize..40,
        ) {
            let mut points: Vec<Point2D> = coords.into_iter().map(Point2D::from).collect();
            let at = duplicate % points.len();
            points.insert(at, points[at]);

            let estimate = CurvatureEstimator::with_defaults()
                .estimate(&PointSequence::new(points.clone()))
                .unwrap();
            prop_assert_eq!(estimate.series.interior().len(), points.len() - 2);
            prop_assert_eq!(estimate.series.padded().len(), points.len());
            for &k in estimate.series.interior() {
                prop_assert!(k.is_finite() && k >= 0.0, "k={}", k);
            }
        }

        #[test]
        fn prop_turning_angle_is_real(
            a in 0.0f64..(2.0 * PI),
            b in 0.0f64..(2.0 * PI),
            stretch in 0.999f64..1.001,
        ) {
            let u = Point2D::new(a.cos() * stretch, a.sin() * stretch);
            let v = Point2D::new(b.cos() * stretch, b.sin() * stretch);
            let theta = turning_angle(&u, &v);
            prop_assert!((0.0..=PI).contains(&theta), "theta={}", theta);
        }
    }
}
