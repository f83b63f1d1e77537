//! Error types shared across pathcurve crates.

use std::path::PathBuf;

/// Top-level error type for pathcurve operations.
///
/// Every variant that originates from a specific file carries its path so
/// that a batch report can name the offending input.
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    #[error("Insufficient points: need at least 2, got {count}")]
    InsufficientPoints { count: usize },

    #[error("Malformed record in {path} at line {line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Auxiliary values do not align with points: {points} points, {aux} aux values")]
    AuxLengthMismatch { points: usize, aux: usize },

    #[error("Backup failed at {path}: {source}")]
    BackupIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Plot error: {message}")]
    Plot { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CurveError.
pub type CurveResult<T> = Result<T, CurveError>;

impl CurveError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn plot(msg: impl Into<String>) -> Self {
        Self::Plot {
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn backup_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::BackupIo {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, line: usize, msg: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            line,
            message: msg.into(),
        }
    }
}
