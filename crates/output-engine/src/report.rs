//! Batch outcome reporting.

use std::path::{Path, PathBuf};

use pathcurve_common::error::{CurveError, CurveResult};
use pathcurve_processing_core::CurvatureSummary;
use serde::Serialize;

/// What happened to one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,

    /// Written curvature file, absent on failure.
    pub output: Option<PathBuf>,

    /// Backup directory that received the previous output, if any.
    pub backup_dir: Option<PathBuf>,

    /// Companion plot, when one was written.
    pub plot: Option<PathBuf>,

    /// Number of points read.
    pub points: Option<usize>,

    pub summary: Option<CurvatureSummary>,

    /// Non-fatal diagnostics, already logged.
    pub warnings: Vec<String>,

    /// Why the file was skipped.
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn failed(input: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
            backup_dir: None,
            plot: None,
            points: None,
            summary: None,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// RFC 3339 timestamps.
    pub started_at: String,
    pub finished_at: String,

    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    /// One entry per discovered input, in discovery order.
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.processed()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.warnings.len()).sum()
    }

    pub fn backups(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().filter_map(|f| f.backup_dir.as_deref())
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> CurveResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| CurveError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(input: &str, warnings: usize) -> FileOutcome {
        FileOutcome {
            output: Some(PathBuf::from(format!("/out/{input}_curvature.txt"))),
            warnings: vec!["degenerate".to_string(); warnings],
            error: None,
            ..FileOutcome::failed(input, "")
        }
    }

    fn report(files: Vec<FileOutcome>) -> BatchReport {
        BatchReport {
            started_at: "2026-01-01T00:00:00+00:00".to_string(),
            finished_at: "2026-01-01T00:00:01+00:00".to_string(),
            input_dir: PathBuf::from("/in"),
            output_dir: PathBuf::from("/out"),
            files,
        }
    }

    #[test]
    fn test_counts() {
        let report = report(vec![
            processed("a", 0),
            processed("b", 2),
            FileOutcome::failed("c", "Insufficient points: need at least 2, got 1"),
        ]);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.warning_count(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_report_json_shape() {
        let report = report(vec![FileOutcome::failed("/in/c.txt", "bad")]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["files"][0]["input"], "/in/c.txt");
        assert_eq!(value["files"][0]["error"], "bad");
        assert!(value["files"][0]["output"].is_null());
    }
}
