//! Terminal charts for the `summary` report.

pub mod ascii;

pub use ascii::*;
