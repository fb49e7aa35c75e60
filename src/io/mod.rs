//! Input/output helpers.
//!
//! - CSV ingest + role resolution (`ingest`)
//! - filtered-row CSV export (`export`)
//! - summary JSON export (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
