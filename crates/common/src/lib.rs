//! pathcurve Common Utilities
//!
//! Shared infrastructure for all pathcurve crates:
//! - Error types and result aliases
//! - Pipeline configuration and named profiles
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
