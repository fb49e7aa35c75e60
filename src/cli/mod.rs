//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code. Filters given here become a `FilterSpec` in `app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Sales analytics dashboard for CSV exports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print KPIs, grouped tables and charts for the filtered data.
    Summary(SummaryArgs),
    /// Write the filtered rows (CSV) and/or the aggregates (JSON).
    Export(ExportArgs),
    /// Launch the interactive dashboard.
    ///
    /// Filters given on the command line become the initial selection; they
    /// can be changed from the sidebar.
    Tui(DataArgs),
}

/// Data source and filter options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Sales CSV (default: $SALES_DASH_DATA, then `sales_data.csv`).
    #[arg(short = 'f', long = "data", value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Choose the CSV interactively from files under the current directory.
    #[arg(long, conflicts_with = "data")]
    pub pick: bool,

    /// First day to include (inclusive). Defaults to the earliest date.
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_day)]
    pub from: Option<NaiveDate>,

    /// Last day to include (inclusive). Defaults to the latest date.
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_day)]
    pub to: Option<NaiveDate>,

    /// Region to include (repeatable). Defaults to every region.
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Category to include (repeatable). Defaults to every category.
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Currency symbol used when printing amounts.
    #[arg(long, default_value = "₹")]
    pub currency: String,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Chart width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Trend chart height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Skip the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,
}

/// Options for exports.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write the filtered rows to this CSV.
    #[arg(long, value_name = "CSV")]
    pub rows: Option<PathBuf>,

    /// Write the aggregates to this JSON file.
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,
}

pub fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD ({e})"))
}
