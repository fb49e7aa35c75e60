//! Shared domain types.
//!
//! These types are intentionally plain so they can be:
//!
//! - built once by the loader and borrowed by every front-end
//! - filtered and aggregated without copying records
//! - exported to CSV/JSON

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Semantic meaning assigned to one column of the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Date,
    Amount,
    Region,
    Category,
}

impl Role {
    /// Resolution order. The first role that fails to resolve is reported.
    pub const ALL: [Role; 4] = [Role::Date, Role::Amount, Role::Region, Role::Category];

    /// Lowercase substrings that mark a header as carrying this role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Date => &["date"],
            Role::Amount => &["sales", "revenue"],
            Role::Region => &["region", "market", "country"],
            Role::Category => &["category", "product"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Date => "date",
            Role::Amount => "amount",
            Role::Region => "region",
            Role::Category => "category",
        }
    }

    /// Keywords rendered for error messages, e.g. "`sales` or `revenue`".
    pub fn keyword_list(self) -> String {
        let quoted: Vec<String> = self.keywords().iter().map(|k| format!("`{k}`")).collect();
        match quoted.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [init @ .., last] => format!("{} or {last}", init.join(", ")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header index resolved for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub date: usize,
    pub amount: usize,
    pub region: usize,
    pub category: usize,
}

impl ColumnRoles {
    pub fn index(&self, role: Role) -> usize {
        match role {
            Role::Date => self.date,
            Role::Amount => self.amount,
            Role::Region => self.region,
            Role::Category => self.category,
        }
    }
}

/// Calendar month a record falls into.
///
/// Ordering is chronological; `Display` renders `YYYY-MM`, which also sorts
/// chronologically as a string for four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodLabel {
    pub year: i32,
    pub month: u32,
}

impl PeriodLabel {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Three-letter month name ("Jan") used for compact chart axes.
    pub fn short_name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???")
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One normalized row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    pub date: NaiveDateTime,
    pub period: PeriodLabel,
    /// `None` when the cell is blank or not numeric.
    pub amount: Option<f64>,
    pub region: String,
    pub category: String,
    /// Every cell of the row, in header order, as read.
    pub fields: Vec<String>,
}

impl Record {
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// A row the loader dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// The loaded table. Built once per run; read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub header: Vec<String>,
    pub roles: ColumnRoles,
    pub records: Vec<Record>,
    pub dropped: Vec<RowError>,
    pub rows_read: usize,
}

impl Dataset {
    /// Header name resolved for `role`.
    pub fn column_name(&self, role: Role) -> &str {
        self.header
            .get(self.roles.index(role))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn regions(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.region.clone()).collect()
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.category.clone()).collect()
    }

    /// Earliest and latest calendar day present, if any.
    pub fn date_span(&self) -> Option<DateRange> {
        let start = self.records.iter().map(Record::day).min()?;
        let end = self.records.iter().map(Record::day).max()?;
        Some(DateRange { start, end })
    }
}

/// Inclusive calendar-day interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// User-chosen constraints applied to the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub range: DateRange,
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterSpec {
    /// Full date span and every observed region/category.
    pub fn unfiltered(dataset: &Dataset) -> Self {
        let range = dataset
            .date_span()
            .unwrap_or(DateRange::new(NaiveDate::MIN, NaiveDate::MAX));
        Self {
            range,
            regions: dataset.regions(),
            categories: dataset.categories(),
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}
