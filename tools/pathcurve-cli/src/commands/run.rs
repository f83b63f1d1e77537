//! Process a directory of path files.

use super::RunArgs;

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.resolve()?;

    println!(
        "Processing {} -> {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    let report = pathcurve_output_engine::run(config)
        .await
        .map_err(|e| anyhow::anyhow!("Batch failed: {e}"))?;

    if report.files.is_empty() {
        println!("  No matching input files.");
    }

    for file in &report.files {
        let name = file
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.input.display().to_string());

        match (&file.error, &file.summary) {
            (Some(error), _) => println!("  [FAIL] {name}: {error}"),
            (None, Some(summary)) => {
                println!(
                    "  [OK]   {name}: {} points, max curvature {:.6}, mean {:.6}",
                    file.points.unwrap_or_default(),
                    summary.max,
                    summary.mean
                );
            }
            (None, None) => println!("  [OK]   {name}"),
        }
        if let Some(backup) = &file.backup_dir {
            println!("         previous output moved to {}", backup.display());
        }
        for warning in &file.warnings {
            println!("         warning: {warning}");
        }
    }

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .map_err(|e| anyhow::anyhow!("Failed to write report: {e}"))?;
        println!("  Report written to: {}", path.display());
    }

    println!(
        "\n{} processed, {} failed, {} warning(s).",
        report.processed(),
        report.failed(),
        report.warning_count()
    );

    if !report.is_clean() {
        anyhow::bail!("{} file(s) could not be processed", report.failed());
    }
    Ok(())
}
