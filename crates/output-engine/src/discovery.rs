//! Input file discovery.

use std::path::{Path, PathBuf};

use pathcurve_common::error::{CurveError, CurveResult};

/// Regular files directly inside `dir` with the given extension and,
/// optionally, file name prefix. Sorted by path.
pub fn discover_inputs(
    dir: &Path,
    extension: &str,
    prefix: Option<&str>,
) -> CurveResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CurveError::io(dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CurveError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(prefix) = prefix {
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix));
            if !matches {
                continue;
            }
        }
        inputs.push(path);
    }

    inputs.sort();
    Ok(inputs)
}
