//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - column roles (`Role`, `ColumnRoles`)
//! - normalized records and the loaded `Dataset`
//! - user filter constraints (`FilterSpec`, `DateRange`)

pub mod types;

pub use types::*;
