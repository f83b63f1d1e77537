//! pathcurve CLI — Batch curvature estimation for sampled 2D paths.
//!
//! Usage:
//!   pathcurve run [OPTIONS]         Process every input file in a directory
//!   pathcurve compute <PATH>        Print the curvature output for one file
//!   pathcurve profile <NAME>        Print a profile as a JSON config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pathcurve_common::config::Profile;
use pathcurve_common::logging::init_logging;

mod commands;

use commands::{ConfigArgs, RunArgs};

#[derive(Parser)]
#[command(
    name = "pathcurve",
    about = "Discrete curvature estimation for sampled paths, with backup rotation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every matching file in the input directory
    Run(RunArgs),

    /// Compute curvature for a single file and print the output text
    Compute {
        /// Path to the input file
        path: PathBuf,

        #[command(flatten)]
        source: ConfigArgs,
    },

    /// Print (or save) a named profile as a JSON config
    Profile {
        /// Profile name: classic | yaw-map
        name: Profile,

        /// Write the config to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging comes from the selected config, then the global flags.
    let logging = match &cli.command {
        Commands::Run(args) => args.source.load()?.logging,
        Commands::Compute { source, .. } => source.load()?.logging,
        Commands::Profile { name, .. } => name.config().logging,
    };
    init_logging(&logging.with_overrides(cli.verbose, cli.json_logs));

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await,
        Commands::Compute { path, source } => commands::compute::run(path, source),
        Commands::Profile { name, output } => commands::profile::run(name, output),
    }
}
