//! pathcurve Path Model
//!
//! Defines the data contracts shared by the estimator and the output engine:
//! - **Point2D:** A planar coordinate with the vector helpers the estimator needs
//! - **PointSequence:** An ordered, validated path with optional per-point yaw
//! - **Reader:** Parses comma-separated path records into a `PointSequence`

pub mod point;
pub mod reader;
pub mod sequence;

pub use point::*;
pub use reader::*;
pub use sequence::*;
