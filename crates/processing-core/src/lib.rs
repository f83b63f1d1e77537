//! pathcurve Processing Core: the curvature estimator
//!
//! Turns an ordered point sequence into per-vertex curvature values:
//! - **Tangents:** Consecutive point differences, clamped away from zero length
//! - **Turning angles:** `acos` of the clamped unit-tangent dot product
//! - **Curvature:** `2 sin(theta) / d` with `d` the mean adjacent segment length
//! - **Endpoint policy:** NaN sentinels or zero padding with a zero floor
//!
//! This crate is pure computation — no I/O, no logging sinks.
//! All inputs are data; all outputs are data, diagnostics included.

pub mod curvature;

pub use curvature::{
    CurvatureEstimate, CurvatureEstimator, CurvatureSeries, CurvatureSummary, GeometryWarning,
};
