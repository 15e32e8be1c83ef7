// fusion_sim/src/simulation/dataset.rs

//! Reader for the whitespace-separated observation log format:
//!
//! ```text
//! L  px   py               timestamp  [gt_px gt_py gt_vx gt_vy ...]
//! R  rho  phi  rho_dot     timestamp  [gt_px gt_py gt_vx gt_vy ...]
//! ```

use fusion_core::messages::Observation;
use fusion_core::types::Timestamp;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::simulation::error::DatasetError;

/// Number of ground-truth columns used when a line carries any.
const GROUND_TRUTH_COLUMNS: usize = 4;

/// True position and Cartesian velocity of the object at an observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTruth {
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
}

/// One line of a dataset: the observation plus, optionally, the truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetRecord {
    pub observation: Observation,
    pub ground_truth: Option<GroundTruth>,
}

fn parse_f64(field: &str, line: usize, name: &str) -> Result<f64, DatasetError> {
    field
        .parse()
        .map_err(|_| DatasetError::malformed(line, format!("invalid {name} `{field}`")))
}

/// Parses a single line. Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(text: &str, line: usize) -> Result<Option<DatasetRecord>, DatasetError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = text.split_whitespace().collect();
    let readings = match fields[0] {
        "L" => 2,
        "R" => 3,
        other => {
            return Err(DatasetError::malformed(
                line,
                format!("unknown sensor tag `{other}`"),
            ))
        }
    };

    // Tag, readings, timestamp.
    let required = 1 + readings + 1;
    if fields.len() < required {
        return Err(DatasetError::malformed(
            line,
            format!("expected at least {required} fields, found {}", fields.len()),
        ));
    }

    let timestamp: Timestamp = fields[readings + 1].parse().map_err(|_| {
        DatasetError::malformed(line, format!("invalid timestamp `{}`", fields[readings + 1]))
    })?;

    let observation = if readings == 2 {
        Observation::lidar(
            timestamp,
            parse_f64(fields[1], line, "px")?,
            parse_f64(fields[2], line, "py")?,
        )
    } else {
        Observation::radar(
            timestamp,
            parse_f64(fields[1], line, "range")?,
            parse_f64(fields[2], line, "bearing")?,
            parse_f64(fields[3], line, "range rate")?,
        )
    };

    let truth_fields = &fields[required..];
    let ground_truth = match truth_fields.len() {
        0 => None,
        n if n < GROUND_TRUTH_COLUMNS => {
            return Err(DatasetError::malformed(
                line,
                format!("expected {GROUND_TRUTH_COLUMNS} ground-truth fields, found {n}"),
            ))
        }
        _ => Some(GroundTruth {
            px: parse_f64(truth_fields[0], line, "ground-truth px")?,
            py: parse_f64(truth_fields[1], line, "ground-truth py")?,
            vx: parse_f64(truth_fields[2], line, "ground-truth vx")?,
            vy: parse_f64(truth_fields[3], line, "ground-truth vy")?,
        }),
    };

    Ok(Some(DatasetRecord {
        observation,
        ground_truth,
    }))
}

/// Parses a whole dataset held in memory.
pub fn parse_str(contents: &str) -> Result<Vec<DatasetRecord>, DatasetError> {
    let mut records = Vec::new();
    for (index, text) in contents.lines().enumerate() {
        if let Some(record) = parse_line(text, index + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

pub fn read_file(path: &Path) -> Result<Vec<DatasetRecord>, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&contents)
}

/// Resolves `path` to the dataset files it names: the file itself, or every
/// `*.txt` file below a directory in sorted order.
pub fn collect_dataset_files(path: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let is_txt = entry.path().extension().is_some_and(|ext| ext == "txt");
        if entry.file_type().is_file() && is_txt {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
