//! Shared "filter -> aggregate" step used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! FilterSpec -> FilteredView -> Summary
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::debug;

use crate::analytics::{FilteredView, Summary, apply, summarize};
use crate::domain::{Dataset, FilterSpec};

/// All computed outputs for one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardRun<'a> {
    pub filter: FilterSpec,
    pub view: FilteredView<'a>,
    pub summary: Summary,
}

/// Filter the dataset and aggregate the result. Always recomputes from scratch.
pub fn run(dataset: &Dataset, filter: FilterSpec) -> DashboardRun<'_> {
    let view = apply(dataset, &filter);
    let summary = summarize(&view);
    debug!(
        start = %filter.range.start,
        end = %filter.range.end,
        regions = filter.regions.len(),
        categories = filter.categories.len(),
        rows = view.len(),
        "recomputed dashboard"
    );
    DashboardRun {
        filter,
        view,
        summary,
    }
}
