//! Formatted terminal output: run header, KPI cards and grouped tables.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (the TUI reuses the same number formatting)

use crate::analytics::{GroupSums, Summary};
use crate::domain::{Dataset, FilterSpec, Role};

/// Placeholder for aggregates that are undefined on an empty selection.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a money amount with thousands separators and no decimals (`₹1,235`).
pub fn format_amount(v: f64, currency: &str) -> String {
    if !v.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{currency}{}", group_thousands(rounded.abs() as u64))
}

/// Like `format_amount`, but `None` renders as `N/A` rather than a zero.
pub fn format_opt_amount(v: Option<f64>, currency: &str) -> String {
    match v {
        Some(v) => format_amount(v, currency),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_count(n: usize) -> String {
    group_thousands(n as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Source, resolved columns and active filter.
pub fn format_run_header(dataset: &Dataset, filter: &FilterSpec) -> String {
    let mut out = String::new();

    out.push_str("=== dash - Sales Analytics ===\n");
    out.push_str(&format!(
        "Source: {} | rows={} dropped={}\n",
        dataset.path.display(),
        dataset.records.len(),
        dataset.dropped.len(),
    ));
    out.push_str(&format!(
        "Columns: date={} | amount={} | region={} | category={}\n",
        dataset.column_name(Role::Date),
        dataset.column_name(Role::Amount),
        dataset.column_name(Role::Region),
        dataset.column_name(Role::Category),
    ));
    out.push_str(&format!(
        "Filter: {} .. {} | regions {}/{} | categories {}/{}\n",
        filter.range.start,
        filter.range.end,
        filter.regions.len(),
        dataset.regions().len(),
        filter.categories.len(),
        dataset.categories().len(),
    ));

    out
}

/// The three KPI cards plus the top region/category line.
pub fn format_kpis(summary: &Summary, currency: &str) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:<22} {:<22} {:<22}",
            "Total Revenue", "Average Order Value", "Total Orders"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:<22} {:<22} {:<22}",
            format_amount(summary.total, currency),
            format_opt_amount(summary.mean, currency),
            format_count(summary.count),
        )
        .trim_end(),
    );
    out.push('\n');

    let top = |t: &Option<crate::analytics::TopKey>| match t {
        Some(t) => format!("{} ({})", t.key, format_amount(t.amount, currency)),
        None => NOT_AVAILABLE.to_string(),
    };
    out.push_str(&format!(
        "Top region: {} | Top category: {}\n",
        top(&summary.top_region),
        top(&summary.top_category)
    ));
    if summary.missing_amounts > 0 {
        out.push_str(&format!(
            "({} row(s) without a numeric amount are counted but not summed)\n",
            summary.missing_amounts
        ));
    }

    out
}

/// Per-region, per-category and per-period tables.
pub fn format_groups(summary: &Summary, currency: &str) -> String {
    let mut out = String::new();

    out.push_str("Sales by region:\n");
    out.push_str(&format_group_table("region", &summary.by_region, currency));
    out.push('\n');

    out.push_str("Sales by category:\n");
    out.push_str(&format_group_table("category", &summary.by_category, currency));
    out.push('\n');

    out.push_str("Sales by month:\n");
    out.push_str(&format!("{:<10} {:>16} {:>8}\n", "period", "amount", "orders"));
    out.push_str(&format!("{:-<10} {:-<16} {:-<8}\n", "", "", ""));
    if summary.by_period.is_empty() {
        out.push_str("(no data)\n");
    }
    for (period, amount) in &summary.by_period {
        let orders = summary.orders_by_period.get(period).copied().unwrap_or(0);
        out.push_str(&format!(
            "{:<10} {:>16} {:>8}\n",
            period.to_string(),
            format_amount(*amount, currency),
            format_count(orders),
        ));
    }

    out
}

fn format_group_table(label: &str, groups: &GroupSums, currency: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>16} {:>7}\n", label, "amount", "share"));
    out.push_str(&format!("{:-<24} {:-<16} {:-<7}\n", "", "", ""));

    if groups.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let shares = groups.shares();
    for (idx, (key, amount)) in groups.iter().enumerate() {
        let share = shares
            .as_ref()
            .and_then(|s| s.get(idx))
            .map(|(_, pct)| format!("{pct:.1}%"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        out.push_str(&format!(
            "{:<24} {:>16} {:>7}\n",
            truncate(key, 24),
            format_amount(amount, currency),
            share,
        ));
    }

    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
