//! Pipeline configuration.
//!
//! Everything the batch needs is carried by an explicit [`PipelineConfig`]
//! handed to the runner at construction time. Two named [`Profile`]s
//! reproduce the deployments the tool grew out of.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Highest decimal count that still round-trips through `f64`.
pub const MAX_DECIMALS: usize = 17;

/// Complete configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory scanned for input path files.
    pub input_dir: PathBuf,

    /// Directory receiving `*_curvature.txt` outputs and backup directories.
    pub output_dir: PathBuf,

    /// Only files whose name starts with this prefix are processed.
    pub input_prefix: Option<String>,

    /// File extension of input files (without the dot).
    pub input_extension: String,

    /// Number of fields per input record.
    pub record_shape: RecordShape,

    /// What to do with a record that does not parse.
    pub malformed_records: MalformedRecordPolicy,

    /// Numerical policy of the curvature estimator.
    pub curvature: CurvatureSettings,

    /// Persisted text format.
    pub output: OutputSettings,

    /// Backup rotation policy.
    pub backup: BackupSettings,

    /// Companion plot image.
    pub plot: PlotSettings,

    /// Upper bound on files processed concurrently.
    pub workers: usize,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Field layout of one input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordShape {
    /// `x,y`
    Xy,
    /// `x,y,yaw`
    XyYaw,
}

impl RecordShape {
    /// Number of comma-separated fields a record must have.
    pub fn field_count(self) -> usize {
        match self {
            RecordShape::Xy => 2,
            RecordShape::XyYaw => 3,
        }
    }
}

/// Tolerance for records that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedRecordPolicy {
    /// Reject the whole file.
    #[default]
    SkipFile,
    /// Drop the offending record and keep reading.
    SkipRecord,
}

/// Endpoint padding and near-zero handling of the curvature series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EndpointPolicy {
    /// Pad both endpoints with NaN ("curvature undefined").
    Sentinel,
    /// Pad both endpoints with 0 and force interior values below `floor` to 0.
    ZeroFloor { floor: f64 },
}

/// Estimator thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvatureSettings {
    /// Segment lengths below this are clamped up to it.
    pub segment_epsilon: f64,

    /// Averaged segment distances below this are clamped up to it.
    pub distance_epsilon: f64,

    pub endpoint: EndpointPolicy,
}

/// Shape of each output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputShape {
    /// One curvature value per line.
    CurvatureOnly,
    /// Echoed coordinates and auxiliary value followed by curvature.
    PointAuxCurvature,
}

/// Text rendering of the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub shape: OutputShape,

    /// Fixed number of decimals for the curvature field.
    pub decimals: usize,

    /// Field delimiter for multi-field lines.
    pub delimiter: String,
}

/// Backup rotation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSettings {
    /// Backup directories are named `{prefix}{i}`.
    pub prefix: String,

    /// Also treat an existing companion plot image as a conflict and move it.
    pub guard_companion: bool,
}

/// Companion plot image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pathcurve=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

/// Named preset reproducing one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// `x,y` inputs, NaN endpoints, 10 decimals, `backup{i}`, PNG companion.
    Classic,
    /// `x,y,yaw` inputs, zero-floored endpoints, 16 decimals, `Backup{i}`.
    YawMap,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Classic, Profile::YawMap];

    pub fn name(self) -> &'static str {
        match self {
            Profile::Classic => "classic",
            Profile::YawMap => "yaw-map",
        }
    }

    /// Full configuration for this profile. Directories are left at their
    /// defaults and are expected to be overridden by the caller.
    pub fn config(self) -> PipelineConfig {
        match self {
            Profile::Classic => PipelineConfig::default(),
            Profile::YawMap => PipelineConfig {
                input_prefix: Some("result_".to_string()),
                record_shape: RecordShape::XyYaw,
                curvature: CurvatureSettings {
                    segment_epsilon: 1e-16,
                    distance_epsilon: 1e-16,
                    endpoint: EndpointPolicy::ZeroFloor { floor: 1e-16 },
                },
                output: OutputSettings {
                    shape: OutputShape::PointAuxCurvature,
                    decimals: 16,
                    delimiter: ",".to_string(),
                },
                backup: BackupSettings {
                    prefix: "Backup".to_string(),
                    guard_companion: false,
                },
                plot: PlotSettings {
                    enabled: false,
                    ..PlotSettings::default()
                },
                ..PipelineConfig::default()
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Profile::ALL.iter().map(|p| p.name()).collect();
                format!("unknown profile '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            input_prefix: None,
            input_extension: "txt".to_string(),
            record_shape: RecordShape::Xy,
            malformed_records: MalformedRecordPolicy::default(),
            curvature: CurvatureSettings::default(),
            output: OutputSettings::default(),
            backup: BackupSettings::default(),
            plot: PlotSettings::default(),
            workers: default_workers(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CurvatureSettings {
    fn default() -> Self {
        Self {
            segment_epsilon: 1e-10,
            distance_epsilon: 1e-10,
            endpoint: EndpointPolicy::Sentinel,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            shape: OutputShape::CurvatureOnly,
            decimals: 10,
            delimiter: ",".to_string(),
        }
    }
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            prefix: "backup".to_string(),
            guard_companion: true,
        }
    }
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 1000,
            height: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Apply command-line flags on top of the configured values.
    pub fn with_overrides(mut self, verbose: bool, json: bool) -> Self {
        if verbose {
            self.level = "debug".to_string();
        }
        self.json |= json;
        self
    }
}

impl PipelineConfig {
    /// Load a config file. Missing fields fall back to the classic defaults.
    pub fn load_from(path: impl AsRef<Path>) -> CurveResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CurveError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> CurveResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CurveError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| CurveError::io(path, e))
    }

    /// Reject configurations the batch pipeline cannot honour.
    pub fn validate(&self) -> CurveResult<()> {
        if self.input_dir == self.output_dir {
            return Err(CurveError::config(format!(
                "input and output directory must differ (both are {})",
                self.input_dir.display()
            )));
        }
        self.validate_settings()
    }

    /// Checks everything except the directories, for single-file use.
    pub fn validate_settings(&self) -> CurveResult<()> {
        if self.backup.prefix.trim().is_empty() {
            return Err(CurveError::config("backup prefix must not be empty"));
        }
        if self.backup.prefix.contains(['/', '\\']) {
            return Err(CurveError::config(format!(
                "backup prefix '{}' must not contain path separators",
                self.backup.prefix
            )));
        }
        for (name, value) in [
            ("segment_epsilon", self.curvature.segment_epsilon),
            ("distance_epsilon", self.curvature.distance_epsilon),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CurveError::config(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if let EndpointPolicy::ZeroFloor { floor } = self.curvature.endpoint {
            if !floor.is_finite() || floor < 0.0 {
                return Err(CurveError::config(format!(
                    "zero floor must be finite and non-negative, got {floor}"
                )));
            }
        }
        if self.output.decimals > MAX_DECIMALS {
            return Err(CurveError::config(format!(
                "decimals must be at most {MAX_DECIMALS}, got {}",
                self.output.decimals
            )));
        }
        if self.output.delimiter.is_empty() {
            return Err(CurveError::config("output delimiter must not be empty"));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
