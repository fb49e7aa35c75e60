//! Export the filtered rows to CSV.
//!
//! The export keeps the source header (every column, in order) and appends a
//! `period` column so the file can be pivoted by month in a spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::analytics::FilteredView;
use crate::domain::Dataset;
use crate::error::AppError;

/// Write the rows of `view` to a CSV file.
pub fn write_rows_csv(path: &Path, dataset: &Dataset, view: &FilteredView<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_rows(file, dataset, view)?;
    info!(rows = view.len(), path = %path.display(), "wrote filtered rows");
    Ok(())
}

/// Write the rows of `view` as CSV to any writer.
pub fn write_rows<W: Write>(out: W, dataset: &Dataset, view: &FilteredView<'_>) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header: Vec<&str> = dataset.header.iter().map(String::as_str).collect();
    header.push("period");
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    let width = dataset.header.len();
    for record in view.iter() {
        let period = record.period.to_string();
        let mut row: Vec<&str> = record.fields.iter().map(String::as_str).collect();
        // Ragged source rows are padded (or cut) to the header width.
        row.resize(width, "");
        row.push(&period);
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::apply;
    use crate::analytics::testing::sample_dataset;
    use crate::domain::FilterSpec;

    #[test]
    fn exports_filtered_rows_with_period() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_categories(["Tech"]);
        let view = apply(&ds, &spec);

        let mut buf = Vec::new();
        write_rows(&mut buf, &ds, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Sales,Region,Category,period");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",North,Tech,2024-01"));
        assert!(lines[2].ends_with(",North,Tech,2024-02"));
    }

    #[test]
    fn empty_view_writes_header_only() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds).with_regions(Vec::<String>::new());
        let mut buf = Vec::new();
        write_rows(&mut buf, &ds, &apply(&ds, &spec)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
