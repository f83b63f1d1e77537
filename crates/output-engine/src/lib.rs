//! pathcurve Output Engine
//!
//! Everything between a path file on disk and a curvature file on disk:
//! - **Discovery:** Select input files by extension and name prefix
//! - **Formatting:** Render curvature (and echoed points) as fixed-precision text
//! - **Backup rotation:** Move a previous output into `{prefix}{i}` before writing
//! - **Plotting:** Companion PNG chart of the padded curvature series
//! - **Batch runner:** Bounded worker pool producing a `BatchReport`

pub mod backup;
pub mod batch;
pub mod discovery;
pub mod format;
pub mod plot;
pub mod report;

pub use backup::{BackupDirectory, BackupManager};
pub use batch::{run, BatchRunner, Evaluation};
pub use format::OutputFormatter;
pub use plot::{CurvaturePlotter, NoPlot, PngPlotter};
pub use report::{BatchReport, FileOutcome};
