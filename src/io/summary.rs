//! Write the aggregates of a run as JSON.
//!
//! The file echoes the filter and the resolved columns next to the numbers so
//! it can be read on its own. An empty selection writes `"mean": null`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::analytics::Summary;
use crate::domain::{Dataset, FilterSpec, Role};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SummaryFile<'a> {
    pub tool: &'static str,
    pub source: String,
    pub columns: ResolvedColumns<'a>,
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub filter: &'a FilterSpec,
    pub summary: &'a Summary,
}

#[derive(Debug, Serialize)]
pub struct ResolvedColumns<'a> {
    pub date: &'a str,
    pub amount: &'a str,
    pub region: &'a str,
    pub category: &'a str,
}

impl<'a> SummaryFile<'a> {
    pub fn new(dataset: &'a Dataset, filter: &'a FilterSpec, summary: &'a Summary) -> Self {
        Self {
            tool: "dash",
            source: dataset.path.display().to_string(),
            columns: ResolvedColumns {
                date: dataset.column_name(Role::Date),
                amount: dataset.column_name(Role::Amount),
                region: dataset.column_name(Role::Region),
                category: dataset.column_name(Role::Category),
            },
            rows_loaded: dataset.records.len(),
            rows_dropped: dataset.dropped.len(),
            filter,
            summary,
        }
    }
}

/// Write a summary JSON file.
pub fn write_summary_json(
    path: &Path,
    dataset: &Dataset,
    filter: &FilterSpec,
    summary: &Summary,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    write_summary(file, dataset, filter, summary)?;
    info!(path = %path.display(), "wrote summary");
    Ok(())
}

pub fn write_summary<W: Write>(
    out: W,
    dataset: &Dataset,
    filter: &FilterSpec,
    summary: &Summary,
) -> Result<(), AppError> {
    let doc = SummaryFile::new(dataset, filter, summary);
    serde_json::to_writer_pretty(out, &doc)
        .map_err(|e| AppError::new(4, format!("Failed to write summary JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::sample_dataset;
    use crate::analytics::{apply, summarize};

    fn render(filter: &FilterSpec) -> serde_json::Value {
        let ds = sample_dataset();
        let summary = summarize(&apply(&ds, filter));
        let mut buf = Vec::new();
        write_summary(&mut buf, &ds, filter, &summary).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn summary_json_shape() {
        let ds = sample_dataset();
        let v = render(&FilterSpec::unfiltered(&ds));

        assert_eq!(v["columns"]["amount"], "Sales");
        assert_eq!(v["summary"]["total"], 350.0);
        assert_eq!(v["summary"]["count"], 3);
        assert_eq!(v["summary"]["by_period"]["2024-01"], 150.0);
        assert_eq!(v["summary"]["by_region"]["North"], 300.0);
        assert_eq!(v["summary"]["top_region"]["key"], "North");
        assert_eq!(v["filter"]["range"]["start"], "2024-01-05");
    }

    #[test]
    fn empty_selection_has_null_mean() {
        let ds = sample_dataset();
        let v = render(&FilterSpec::unfiltered(&ds).with_regions(Vec::<String>::new()));
        assert!(v["summary"]["mean"].is_null());
        assert!(v["summary"]["top_region"].is_null());
        assert_eq!(v["summary"]["total"], 0.0);
    }
}
