//! Planar points and the vector arithmetic used on them.

use serde::{Deserialize, Serialize};

/// A 2D point, or the difference of two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn to(&self, other: &Point2D) -> Point2D {
        Point2D {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }

    /// Euclidean length when treated as a vector.
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise division by a scalar.
    pub fn scaled_by_inverse(&self, divisor: f64) -> Point2D {
        Point2D {
            x: self.x / divisor,
            y: self.y / divisor,
        }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
