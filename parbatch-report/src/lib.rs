#![warn(missing_docs)]
//! Parbatch Report
//!
//! Report data structures and rendering for executed batches:
//! - serde types capturing a batch (label, workers, elapsed time, rows)
//! - JSON serialization
//! - human-readable table formatting for terminal/log output

mod report;
mod table;

pub use report::{BatchReport, OutputFormat, ReportMeta, ScoreRow, UnknownFormat};
pub use table::{format_fold_listing, format_score_table};

/// Current report schema version, bumped on breaking layout changes.
pub const SCHEMA_VERSION: u32 = 1;
