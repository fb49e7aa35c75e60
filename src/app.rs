//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads `.env`
//! - sets up logging
//! - loads the dataset once and lends it to the chosen front-end
//! - prints reports or writes exports

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DataArgs, ExportArgs, SummaryArgs};
use crate::domain::{Dataset, DateRange, FilterSpec};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable naming the default data file.
pub const DATA_ENV: &str = "SALES_DASH_DATA";
/// Used when neither `--data` nor `SALES_DASH_DATA` is given.
pub const DEFAULT_DATA_PATH: &str = "sales_data.csv";

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `dash` and `dash -f x.csv` behave like `dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(matches!(cli.command, Command::Tui(_)));

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// Logs go to stderr. The TUI owns the terminal, so it logs nothing unless
/// `RUST_LOG` asks for it.
fn init_logging(tui: bool) {
    let default = if tui { "off" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let dataset = load(&args.data)?;
    let filter = filter_spec_from_args(&args.data, &dataset);
    let run = pipeline::run(&dataset, filter);
    let currency = args.data.currency.as_str();

    println!("{}", crate::report::format_run_header(&dataset, &run.filter));
    println!("{}", crate::report::format_kpis(&run.summary, currency));
    println!("{}", crate::report::format_groups(&run.summary, currency));

    if !args.no_plot {
        let by_product: Vec<(String, f64)> = run
            .summary
            .by_category
            .ascending()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        println!(
            "{}",
            crate::plot::render_bar_chart("Revenue by product", &by_product, args.width, |v| {
                crate::report::format_amount(v, currency)
            })
        );

        let orders: Vec<(String, f64)> = run
            .summary
            .orders_by_period
            .iter()
            .map(|(p, n)| (p.to_string(), *n as f64))
            .collect();
        println!(
            "{}",
            crate::plot::render_bar_chart("Monthly orders", &orders, args.width, |v| format!("{v:.0}"))
        );

        println!("Sales by region over time:");
        println!(
            "{}",
            crate::plot::render_trend_plot(&run.summary.region_trend, args.width, args.height)
        );
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.rows.is_none() && args.summary.is_none() {
        return Err(AppError::new(
            2,
            "Nothing to export: pass `--rows <CSV>` and/or `--summary <JSON>`.",
        ));
    }

    let dataset = load(&args.data)?;
    let filter = filter_spec_from_args(&args.data, &dataset);
    let run = pipeline::run(&dataset, filter);

    if let Some(path) = &args.rows {
        crate::io::export::write_rows_csv(path, &dataset, &run.view)?;
        println!("Wrote {} row(s) to {}", run.view.len(), path.display());
    }
    if let Some(path) = &args.summary {
        crate::io::summary::write_summary_json(path, &dataset, &run.filter, &run.summary)?;
        println!("Wrote summary to {}", path.display());
    }

    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    let dataset = load(&args)?;
    let filter = filter_spec_from_args(&args, &dataset);
    crate::tui::run(&dataset, filter, &args.currency)
}

fn load(args: &DataArgs) -> Result<Dataset, AppError> {
    let path = resolve_data_path(args)?;
    Ok(crate::io::ingest::load_dataset(&path)?)
}

/// `--data`, then the picker (`--pick`), then `$SALES_DASH_DATA`, then the default.
pub fn resolve_data_path(args: &DataArgs) -> Result<PathBuf, AppError> {
    if let Some(path) = &args.data {
        return Ok(path.clone());
    }
    if args.pick {
        return crate::cli::picker::prompt_for_data_path();
    }
    Ok(std::env::var_os(DATA_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)))
}

/// Start from "everything selected" and narrow by whatever flags were given.
pub fn filter_spec_from_args(args: &DataArgs, dataset: &Dataset) -> FilterSpec {
    let mut spec = FilterSpec::unfiltered(dataset);

    if args.from.is_some() || args.to.is_some() {
        let range = DateRange::new(
            args.from.unwrap_or(spec.range.start),
            args.to.unwrap_or(spec.range.end),
        );
        spec = spec.with_range(range);
    }

    if !args.regions.is_empty() {
        for r in args.regions.iter().filter(|r| !spec.regions.contains(*r)) {
            warn!(region = %r, "region not present in the data");
        }
        spec = spec.with_regions(args.regions.iter().cloned());
    }

    if !args.categories.is_empty() {
        for c in args.categories.iter().filter(|c| !spec.categories.contains(*c)) {
            warn!(category = %c, "category not present in the data");
        }
        spec = spec.with_categories(args.categories.iter().cloned());
    }

    spec
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                       -> `dash tui`
/// - `dash -f sales.csv ...`      -> `dash tui -f sales.csv ...`
/// - `dash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{day, sample_dataset};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["dash"])), argv(&["dash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["dash", "-f", "x.csv"])),
            argv(&["dash", "tui", "-f", "x.csv"])
        );
        assert_eq!(rewrite_args(argv(&["dash", "--help"])), argv(&["dash", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["dash", "summary"])),
            argv(&["dash", "summary"])
        );
    }

    #[test]
    fn no_flags_means_unfiltered() {
        let ds = sample_dataset();
        let spec = filter_spec_from_args(&DataArgs::default(), &ds);
        assert_eq!(spec, FilterSpec::unfiltered(&ds));
    }

    #[test]
    fn flags_narrow_the_filter() {
        let ds = sample_dataset();
        let args = DataArgs {
            to: Some(day(2024, 1, 31)),
            regions: vec!["North".to_string()],
            ..DataArgs::default()
        };
        let spec = filter_spec_from_args(&args, &ds);
        assert_eq!(spec.range, DateRange::new(day(2024, 1, 5), day(2024, 1, 31)));
        assert_eq!(spec.regions.len(), 1);
        assert_eq!(spec.categories.len(), 2);
    }

    #[test]
    fn from_alone_keeps_observed_end() {
        let ds = sample_dataset();
        let args = DataArgs {
            from: Some(day(2024, 1, 10)),
            ..DataArgs::default()
        };
        let spec = filter_spec_from_args(&args, &ds);
        assert_eq!(spec.range, DateRange::new(day(2024, 1, 10), day(2024, 2, 1)));
    }

    #[test]
    fn explicit_data_path_wins() {
        let args = DataArgs {
            data: Some(PathBuf::from("given.csv")),
            ..DataArgs::default()
        };
        assert_eq!(resolve_data_path(&args).unwrap(), PathBuf::from("given.csv"));
    }
}
