//! Compute curvature for one file and print it.

use std::path::PathBuf;

use pathcurve_output_engine::OutputFormatter;
use pathcurve_path_model::reader::read_sequence;
use pathcurve_processing_core::CurvatureEstimator;

use super::ConfigArgs;

pub fn run(path: PathBuf, source: ConfigArgs) -> anyhow::Result<()> {
    let config = source.load()?;
    config.validate_settings()?;

    let parsed = read_sequence(&path, config.record_shape, config.malformed_records)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let estimate = CurvatureEstimator::new(config.curvature)
        .estimate(&parsed.sequence)
        .map_err(|e| anyhow::anyhow!("Failed to compute {}: {e}", path.display()))?;

    for warning in &estimate.warnings {
        tracing::warn!(path = %path.display(), "{warning}");
    }

    let padded = estimate.series.padded();
    let text = OutputFormatter::new(config.output).render(&parsed.sequence, &padded)?;
    print!("{text}");

    Ok(())
}
