//! CSV input/output records.

use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;
use tracing::info;

/// Input and output matrices read from a CSV file, time-major.
#[derive(Debug)]
pub struct Record {
    pub u: Array2<f64>,
    pub y: Array2<f64>,
}

impl Record {
    pub fn n(&self) -> usize {
        self.y.nrows()
    }
}

/// Reads the named `inputs` and `outputs` columns of a CSV file with a
/// header row.
pub fn read_csv(path: &Path, inputs: &[String], outputs: &[String]) -> Result<Record> {
    if outputs.is_empty() {
        bail!("no output columns: set [data].outputs in config");
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open CSV: {}", path.display()))?;

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let locate = |name: &String| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("column {name:?} not found in {}", path.display()))
    };
    let input_idx = inputs.iter().map(&locate).collect::<Result<Vec<_>>>()?;
    let output_idx = outputs.iter().map(&locate).collect::<Result<Vec<_>>>()?;

    let mut u_values = Vec::new();
    let mut y_values = Vec::new();
    let mut n = 0;
    for (row, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = row + 2;
        let record = record.with_context(|| format!("failed to read CSV line {line}"))?;
        let field = |idx: usize| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse::<f64>()
                .with_context(|| format!("line {line}: cannot parse {raw:?} as a number"))
        };
        for &idx in &input_idx {
            u_values.push(field(idx)?);
        }
        for &idx in &output_idx {
            y_values.push(field(idx)?);
        }
        n += 1;
    }

    let u = Array2::from_shape_vec((n, input_idx.len()), u_values)?;
    let y = Array2::from_shape_vec((n, output_idx.len()), y_values)?;
    info!(path = %path.display(), n, nu = u.ncols(), ny = y.ncols(), "data loaded");
    Ok(Record { u, y })
}
