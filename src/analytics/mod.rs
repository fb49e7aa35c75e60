//! The data preparation and filtering pipeline.
//!
//! - `schema`: column-role resolution
//! - `dates`: best-effort date parsing
//! - `filter`: `FilterSpec` -> `FilteredView`
//! - `aggregate`: `FilteredView` -> `Summary`
//!
//! Loading lives in `io::ingest`; it uses `schema` and `dates` so that rows
//! with unusable dates never reach the filter.

pub mod aggregate;
pub mod dates;
pub mod filter;
pub mod schema;

pub use aggregate::{GroupSums, Summary, TopKey, summarize};
pub use filter::{FilteredView, apply};

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use chrono::{NaiveDate, NaiveTime};

    use crate::domain::{ColumnRoles, Dataset, PeriodLabel, Record};

    pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn record(line: usize, date: NaiveDate, amount: Option<f64>, region: &str, category: &str) -> Record {
        Record {
            line,
            date: date.and_time(NaiveTime::MIN),
            period: PeriodLabel::of(date),
            amount,
            region: region.to_string(),
            category: category.to_string(),
            fields: vec![
                date.to_string(),
                amount.map(|a| a.to_string()).unwrap_or_default(),
                region.to_string(),
                category.to_string(),
            ],
        }
    }

    /// The three-record dataset used throughout the pipeline tests.
    pub fn sample_dataset() -> Dataset {
        Dataset {
            path: PathBuf::from("sample.csv"),
            header: vec![
                "Date".to_string(),
                "Sales".to_string(),
                "Region".to_string(),
                "Category".to_string(),
            ],
            roles: ColumnRoles {
                date: 0,
                amount: 1,
                region: 2,
                category: 3,
            },
            records: vec![
                record(2, day(2024, 1, 5), Some(100.0), "North", "Tech"),
                record(3, day(2024, 1, 20), Some(50.0), "South", "Food"),
                record(4, day(2024, 2, 1), Some(200.0), "North", "Tech"),
            ],
            dropped: Vec::new(),
            rows_read: 3,
        }
    }
}
