//! Subcommand implementations and the config flags they share.

use std::path::PathBuf;

use clap::Args;
use pathcurve_common::config::{MalformedRecordPolicy, PipelineConfig, Profile};

pub mod compute;
pub mod profile;
pub mod run;

/// Where the base configuration comes from.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Named profile used when no config file is given: classic | yaw-map
    #[arg(long, default_value = "classic")]
    pub profile: Profile,

    /// JSON config file (takes precedence over --profile)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip unparseable records instead of the whole file
    #[arg(long)]
    pub skip_bad_records: bool,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_from(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config {}: {e}", path.display())
            })?,
            None => self.profile.config(),
        };
        if self.skip_bad_records {
            config.malformed_records = MalformedRecordPolicy::SkipRecord;
        }
        Ok(config)
    }
}

/// Flags for `pathcurve run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ConfigArgs,

    /// Input directory
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only process files whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Decimal places for curvature values
    #[arg(long)]
    pub decimals: Option<usize>,

    /// Maximum number of files processed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Do not render companion PNG plots
    #[arg(long)]
    pub no_plot: bool,

    /// Write a JSON batch report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RunArgs {
    /// Base config with command-line overrides applied.
    pub fn resolve(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = self.source.load()?;
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.input_prefix = Some(prefix.clone());
        }
        if let Some(decimals) = self.decimals {
            config.output.decimals = decimals;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.no_plot {
            config.plot.enabled = false;
        }
        config.validate()?;
        Ok(config)
    }
}
