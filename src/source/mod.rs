//! Dataset and schema-report retrieval
//!
//! Provides:
//! - Location parsing (remote URL or local file)
//! - Dataset loading into a polars `DataFrame` (fatal on failure)
//! - Best-effort schema report loading with fallback to an empty report
//! - Target/feature resolution against the loaded dataset

mod fetch;
mod schema;

pub use fetch::{Location, fetch_dataset, fetch_report, try_fetch_report, parse_csv};
pub use schema::{SchemaReport, ResolvedSchema};
