//! Reporting utilities: KPI cards and grouped tables for terminal output.

pub mod format;

pub use format::*;
