//! Batch runner: discover, estimate, back up, write, plot.
//!
//! Each input is handled independently. A failure is recorded in the
//! [`BatchReport`] and never aborts the remaining files. Files run on a
//! bounded pool of blocking tasks; backup rotation is serialized by the
//! shared [`BackupManager`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pathcurve_common::config::PipelineConfig;
use pathcurve_common::error::{CurveError, CurveResult};
use pathcurve_path_model::reader::{read_sequence, SkippedRecord};
use pathcurve_path_model::sequence::PointSequence;
use pathcurve_processing_core::{CurvatureEstimate, CurvatureEstimator};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::backup::BackupManager;
use crate::discovery::discover_inputs;
use crate::format::OutputFormatter;
use crate::plot::{CurvaturePlotter, NoPlot, PngPlotter};
use crate::report::{BatchReport, FileOutcome};

/// Suffix appended to the input stem for every output artifact.
pub const OUTPUT_SUFFIX: &str = "_curvature";

/// A loaded and estimated input, before anything is written.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub sequence: PointSequence,
    pub estimate: CurvatureEstimate,
    pub skipped: Vec<SkippedRecord>,
}

/// Runs the pipeline for one configuration.
pub struct BatchRunner {
    config: PipelineConfig,
    estimator: CurvatureEstimator,
    formatter: OutputFormatter,
    backups: BackupManager,
    plotter: Arc<dyn CurvaturePlotter>,
}

impl BatchRunner {
    /// Validate `config` and build the pipeline stages it describes.
    pub fn new(config: PipelineConfig) -> CurveResult<Self> {
        config.validate()?;

        let plotter: Arc<dyn CurvaturePlotter> = if config.plot.enabled {
            Arc::new(PngPlotter::from_settings(&config.plot))
        } else {
            Arc::new(NoPlot)
        };

        Ok(Self {
            estimator: CurvatureEstimator::new(config.curvature),
            formatter: OutputFormatter::new(config.output.clone()),
            backups: BackupManager::new(&config.output_dir, config.backup.clone()),
            plotter,
            config,
        })
    }

    /// Replace the plot collaborator.
    pub fn with_plotter(mut self, plotter: Arc<dyn CurvaturePlotter>) -> Self {
        self.plotter = plotter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    /// Inputs selected by the configured directory, extension and prefix.
    pub fn discover(&self) -> CurveResult<Vec<PathBuf>> {
        discover_inputs(
            &self.config.input_dir,
            &self.config.input_extension,
            self.config.input_prefix.as_deref(),
        )
    }

    /// `{output_dir}/{stem}_curvature.txt`
    pub fn output_path_for(&self, input: &Path) -> CurveResult<PathBuf> {
        let stem = input.file_stem().ok_or_else(|| {
            CurveError::config(format!("input path has no file name: {}", input.display()))
        })?;
        Ok(self.config.output_dir.join(format!(
            "{}{OUTPUT_SUFFIX}.txt",
            stem.to_string_lossy()
        )))
    }

    /// Read and estimate one file without touching the output directory.
    pub fn evaluate(&self, input: &Path) -> CurveResult<Evaluation> {
        let parsed = read_sequence(
            input,
            self.config.record_shape,
            self.config.malformed_records,
        )?;
        let estimate = self.estimator.estimate(&parsed.sequence)?;
        Ok(Evaluation {
            sequence: parsed.sequence,
            estimate,
            skipped: parsed.skipped,
        })
    }

    /// Process one input end to end. Errors are captured in the outcome.
    pub fn process_file(&self, input: &Path) -> FileOutcome {
        match self.try_process(input) {
            Ok(outcome) => {
                tracing::info!(path = %input.display(), "Processing completed");
                outcome
            }
            Err(e) => {
                tracing::error!(path = %input.display(), "Skipping file: {e}");
                FileOutcome::failed(input, e.to_string())
            }
        }
    }

    fn try_process(&self, input: &Path) -> CurveResult<FileOutcome> {
        tracing::debug!(path = %input.display(), "Processing input");

        let Evaluation {
            sequence,
            estimate,
            skipped,
        } = self.evaluate(input)?;

        let mut warnings: Vec<String> = skipped
            .iter()
            .map(|s| format!("line {} skipped: {}", s.line, s.message))
            .collect();

        for warning in &estimate.warnings {
            tracing::warn!(path = %input.display(), "{warning}");
            warnings.push(warning.to_string());
        }

        let output_path = self.output_path_for(input)?;
        let backup = self.backups.protect(&output_path)?;
        if let Some(backup) = &backup {
            tracing::info!(
                path = %input.display(),
                backup = %backup.path.display(),
                "Moved previous output to backup"
            );
        }

        let padded = estimate.series.padded();
        self.formatter.write(&output_path, &sequence, &padded)?;

        let plot = if self.config.plot.enabled {
            let plot_path = BackupManager::companion_path(&output_path);
            match self.plotter.plot(&padded, &plot_path) {
                Ok(()) => Some(plot_path),
                Err(e) => {
                    tracing::warn!(path = %input.display(), "Plot not written: {e}");
                    warnings.push(e.to_string());
                    None
                }
            }
        } else {
            None
        };

        Ok(FileOutcome {
            input: input.to_path_buf(),
            output: Some(output_path),
            backup_dir: backup.map(|b| b.path),
            plot,
            points: Some(sequence.len()),
            summary: Some(estimate.series.summary()),
            warnings,
            error: None,
        })
    }

    fn prepare(&self) -> CurveResult<Vec<PathBuf>> {
        let out = &self.config.output_dir;
        std::fs::create_dir_all(out).map_err(|e| CurveError::io(out, e))?;
        let inputs = self.discover()?;
        tracing::info!(
            input_dir = %self.config.input_dir.display(),
            files = inputs.len(),
            "Discovered inputs"
        );
        Ok(inputs)
    }

    /// Process every input on the calling thread, in discovery order.
    pub fn run_sequential(&self) -> CurveResult<BatchReport> {
        let started_at = now();
        let inputs = self.prepare()?;
        let files = inputs.iter().map(|input| self.process_file(input)).collect();
        Ok(self.report(started_at, files))
    }

    /// Process every input on at most `workers` blocking tasks.
    ///
    /// The report lists files in discovery order regardless of completion
    /// order.
    pub async fn run(self: Arc<Self>) -> CurveResult<BatchReport> {
        let started_at = now();
        let inputs = self.prepare()?;

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks = JoinSet::new();

        for (index, input) in inputs.iter().cloned().enumerate() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let runner = Arc::clone(&self);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (index, runner.process_file(&input))
            });
        }

        let mut slots: Vec<Option<FileOutcome>> = vec![None; inputs.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!("Worker task failed: {e}"),
            }
        }

        let files = slots
            .into_iter()
            .zip(inputs)
            .map(|(slot, input)| {
                slot.unwrap_or_else(|| FileOutcome::failed(input, "worker task did not complete"))
            })
            .collect();

        Ok(self.report(started_at, files))
    }

    fn report(&self, started_at: String, files: Vec<FileOutcome>) -> BatchReport {
        let report = BatchReport {
            started_at,
            finished_at: now(),
            input_dir: self.config.input_dir.clone(),
            output_dir: self.config.output_dir.clone(),
            files,
        };
        tracing::info!(
            processed = report.processed(),
            failed = report.failed(),
            warnings = report.warning_count(),
            "Batch finished"
        );
        report
    }
}

/// Build a runner for `config` and process the whole batch.
pub async fn run(config: PipelineConfig) -> CurveResult<BatchReport> {
    let runner = Arc::new(BatchRunner::new(config)?);
    runner.run().await
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathcurve_common::config::Profile;

    fn runner_for(name: &str) -> (PathBuf, BatchRunner) {
        let root = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("in")).unwrap();

        let mut config = Profile::Classic.config();
        config.input_dir = root.join("in");
        config.output_dir = root.join("out");
        config.plot.enabled = false;
        (root, BatchRunner::new(config).unwrap())
    }

    #[test]
    fn test_output_path_naming() {
        let (root, runner) = runner_for("pathcurve_test_batch_naming");
        let path = runner.output_path_for(Path::new("/data/in/lap_3.txt")).unwrap();
        assert_eq!(path, root.join("out").join("lap_3_curvature.txt"));
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Profile::Classic.config();
        config.output_dir = config.input_dir.clone();
        assert!(BatchRunner::new(config).is_err());
    }

    #[test]
    fn test_process_file_writes_output() {
        let (root, runner) = runner_for("pathcurve_test_batch_single");
        let input = root.join("in").join("line.txt");
        std::fs::write(&input, "0,0\n1,0\n2,0\n").unwrap();
        std::fs::create_dir_all(root.join("out")).unwrap();

        let outcome = runner.process_file(&input);
        assert!(outcome.is_success(), "{:?}", outcome.error);
        assert_eq!(outcome.points, Some(3));
        assert_eq!(
            std::fs::read_to_string(root.join("out").join("line_curvature.txt")).unwrap(),
            "NaN\n0.0\nNaN\n"
        );

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_single_point_file_is_skipped_without_backup() {
        let (root, runner) = runner_for("pathcurve_test_batch_short");
        let input = root.join("in").join("short.txt");
        std::fs::write(&input, "5,5\n").unwrap();
        std::fs::create_dir_all(root.join("out")).unwrap();
        let previous = root.join("out").join("short_curvature.txt");
        std::fs::write(&previous, "keep").unwrap();

        let outcome = runner.process_file(&input);
        assert!(!outcome.is_success());
        assert!(outcome.error.unwrap().contains("Insufficient points"));
        assert_eq!(std::fs::read_to_string(&previous).unwrap(), "keep");
        assert!(!root.join("out").join("backup1").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_evaluate_reports_degenerate_geometry() {
        let (root, runner) = runner_for("pathcurve_test_batch_degenerate");
        let input = root.join("in").join("dup.txt");
        std::fs::write(&input, "0,0\n1,0\n1,0\n2,1\n").unwrap();

        let evaluation = runner.evaluate(&input).unwrap();
        assert_eq!(evaluation.estimate.warnings.len(), 1);
        assert!(evaluation
            .estimate
            .series
            .interior()
            .iter()
            .all(|k| k.is_finite() && *k >= 0.0));

        std::fs::remove_dir_all(&root).ok();
    }
}
