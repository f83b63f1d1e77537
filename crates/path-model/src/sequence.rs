//! Ordered point sequences loaded from one input file.

use pathcurve_common::error::{CurveError, CurveResult};
use serde::Serialize;

use crate::point::Point2D;

/// Fewest points for which curvature can be computed.
pub const MIN_POINTS: usize = 2;

/// An ordered path with an optional per-point auxiliary scalar (yaw).
///
/// Immutable once built. When `aux` is present it has exactly one value per
/// point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSequence {
    points: Vec<Point2D>,
    aux: Option<Vec<f64>>,
}

impl PointSequence {
    /// A sequence without auxiliary values.
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points, aux: None }
    }

    /// A sequence carrying one auxiliary value per point.
    pub fn with_aux(points: Vec<Point2D>, aux: Vec<f64>) -> CurveResult<Self> {
        if points.len() != aux.len() {
            return Err(CurveError::AuxLengthMismatch {
                points: points.len(),
                aux: aux.len(),
            });
        }
        Ok(Self {
            points,
            aux: Some(aux),
        })
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn aux(&self) -> Option<&[f64]> {
        self.aux.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fails with `InsufficientPoints` when fewer than two points are present.
    pub fn ensure_computable(&self) -> CurveResult<()> {
        if self.points.len() < MIN_POINTS {
            return Err(CurveError::InsufficientPoints {
                count: self.points.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<Point2D> for PointSequence {
    fn from_iter<I: IntoIterator<Item = Point2D>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_aux_rejects_misaligned_lengths() {
        let points = vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)];
        let err = PointSequence::with_aux(points, vec![0.0]).unwrap_err();
        assert!(matches!(
            err,
            CurveError::AuxLengthMismatch { points: 2, aux: 1 }
        ));
    }

    #[test]
    fn test_single_point_is_not_computable() {
        let seq = PointSequence::new(vec![Point2D::new(1.0, 1.0)]);
        assert!(matches!(
            seq.ensure_computable(),
            Err(CurveError::InsufficientPoints { count: 1 })
        ));
        assert!(PointSequence::new(vec![]).ensure_computable().is_err());
    }

    #[test]
    fn test_two_points_are_computable() {
        let seq: PointSequence = [(0.0, 0.0), (1.0, 1.0)]
            .into_iter()
            .map(Point2D::from)
            .collect();
        assert!(seq.ensure_computable().is_ok());
        assert!(seq.aux().is_none());
    }

    #[test]
    fn test_sequence_serialization() {
        let seq = PointSequence::with_aux(
            vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)],
            vec![0.0, 0.5],
        )
        .unwrap();
        let value = serde_json::to_value(&seq).unwrap();
        assert_eq!(value["points"][1]["x"], 1.0);
        assert_eq!(value["aux"][1], 0.5);
    }
}
