//! CSV ingest and normalization.
//!
//! This module turns a sales CSV into a `Dataset`:
//!
//! - resolve the date/amount/region/category columns from the header
//! - parse each row's date; rows without a usable date are dropped here,
//!   before any filter or aggregate can see them
//! - keep every cell so the export can re-emit the original columns
//!
//! Schema problems are fatal. Row problems are recorded in `Dataset::dropped`;
//! a file where every row is dropped still loads, as an empty dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::analytics::dates::parse_datetime;
use crate::analytics::schema::resolve_roles;
use crate::domain::{ColumnRoles, Dataset, PeriodLabel, Record, RowError};
use crate::error::PipelineError;

/// Open and load the CSV at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::MissingInput {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset(file, path)
}

/// Load a dataset from any reader. `path` is only used for labelling.
pub fn read_dataset<R: Read>(input: R, path: &Path) -> Result<Dataset, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let roles = resolve_roles(&header)?;
    info!(
        date = %header[roles.date],
        amount = %header[roles.amount],
        region = %header[roles.region],
        category = %header[roles.category],
        "resolved column roles"
    );

    let mut records = Vec::new();
    let mut dropped = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts at line 2, after the header.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(line, error = %e, "dropping undecodable row");
                dropped.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match normalize_row(&row, &roles, line) {
            Ok(record) => records.push(record),
            Err(message) => {
                debug!(line, %message, "dropping row");
                dropped.push(RowError { line, message });
            }
        }
    }

    if records.is_empty() {
        warn!(rows_read, path = %path.display(), "no row has a usable date; the dataset is empty");
    } else if !dropped.is_empty() {
        warn!(
            dropped = dropped.len(),
            rows_read, "some rows were dropped while loading"
        );
    }
    info!(rows = records.len(), path = %path.display(), "dataset loaded");

    Ok(Dataset {
        path: path.to_path_buf(),
        header,
        roles,
        records,
        dropped,
        rows_read,
    })
}

fn normalize_row(row: &StringRecord, roles: &ColumnRoles, line: usize) -> Result<Record, String> {
    let raw_date = cell(row, roles.date);
    let date = parse_datetime(raw_date).ok_or_else(|| format!("Unparseable date '{raw_date}'."))?;

    Ok(Record {
        line,
        date,
        period: PeriodLabel::of(date.date()),
        amount: parse_amount(cell(row, roles.amount)),
        region: cell(row, roles.region).to_string(),
        category: cell(row, roles.category).to_string(),
        fields: row.iter().map(str::to_string).collect(),
    })
}

/// Missing trailing cells on ragged rows read as empty.
fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn parse_amount(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
