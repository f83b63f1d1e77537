//! Parser for comma-separated path records.
//!
//! One record per line, `x,y` or `x,y,yaw`, no header. Blank lines are
//! ignored. Whether a bad record rejects the file or is merely skipped is
//! decided by [`MalformedRecordPolicy`].

use std::path::Path;

use pathcurve_common::config::{MalformedRecordPolicy, RecordShape};
use pathcurve_common::error::{CurveError, CurveResult};

use crate::point::Point2D;
use crate::sequence::PointSequence;

/// A record dropped under [`MalformedRecordPolicy::SkipRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

/// Result of parsing one input file.
#[derive(Debug, Clone)]
pub struct ParsedRecords {
    pub sequence: PointSequence,
    pub skipped: Vec<SkippedRecord>,
}

/// Read and parse a path file.
pub fn read_sequence(
    path: &Path,
    shape: RecordShape,
    policy: MalformedRecordPolicy,
) -> CurveResult<ParsedRecords> {
    let content = std::fs::read_to_string(path).map_err(|e| CurveError::io(path, e))?;
    parse_records(&content, shape, policy, path)
}

/// Parse record text. `source` is only used to label errors.
pub fn parse_records(
    text: &str,
    shape: RecordShape,
    policy: MalformedRecordPolicy,
    source: &Path,
) -> CurveResult<ParsedRecords> {
    let mut points = Vec::new();
    let mut aux = Vec::new();
    let mut skipped = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_fields(line, shape.field_count()) {
            Ok(fields) => {
                points.push(Point2D::new(fields[0], fields[1]));
                if shape == RecordShape::XyYaw {
                    aux.push(fields[2]);
                }
            }
            Err(message) => match policy {
                MalformedRecordPolicy::SkipFile => {
                    return Err(CurveError::malformed(source, line_no, message));
                }
                MalformedRecordPolicy::SkipRecord => {
                    tracing::warn!(
                        path = %source.display(),
                        line = line_no,
                        "Skipping malformed record: {message}"
                    );
                    skipped.push(SkippedRecord {
                        line: line_no,
                        message,
                    });
                }
            },
        }
    }

    let sequence = match shape {
        RecordShape::Xy => PointSequence::new(points),
        RecordShape::XyYaw => PointSequence::with_aux(points, aux)?,
    };

    Ok(ParsedRecords { sequence, skipped })
}

fn parse_fields(line: &str, expected: usize) -> Result<Vec<f64>, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(format!(
            "expected {expected} fields, got {}",
            fields.len()
        ));
    }

    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field
                .parse::<f64>()
                .map_err(|e| format!("field {} ('{field}') is not a number: {e}", i + 1))
        })
        .collect()
}
