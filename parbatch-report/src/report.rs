//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete record of one executed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Batch metadata.
    pub meta: ReportMeta,
    /// One row per job, in job-index order.
    pub rows: Vec<ScoreRow>,
    /// Arithmetic mean of the successful scores, when the caller computed
    /// one (fold mode).
    pub mean: Option<f64>,
}

/// Batch metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version.
    pub schema_version: u32,
    /// Library version that produced the report.
    pub version: String,
    /// Caller-supplied batch label.
    pub label: String,
    /// Worker budget used for the batch.
    pub workers: usize,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub elapsed_ms: f64,
    /// UTC time the report was built.
    pub timestamp: DateTime<Utc>,
}

impl ReportMeta {
    /// Build metadata for a batch executed now.
    pub fn new(label: impl Into<String>, workers: usize, elapsed_ms: f64) -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            label: label.into(),
            workers,
            elapsed_ms,
            timestamp: Utc::now(),
        }
    }
}

/// One scored result row: a label, a sub-label and a numeric score.
///
/// A failed job is recorded with `score: None` and the failure message in
/// `detail` left intact by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Primary label (e.g. a dataset name).
    pub label: String,
    /// Secondary label (e.g. a method name).
    pub detail: String,
    /// The score, absent when the job failed.
    pub score: Option<f64>,
}

impl ScoreRow {
    /// A row for a job that produced a score.
    pub fn scored(label: impl Into<String>, detail: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            score: Some(score),
        }
    }

    /// A row for a job that failed.
    pub fn failed(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            score: None,
        }
    }
}

impl BatchReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Human => {
                Ok(crate::table::format_score_table(&self.meta.label, &self.rows))
            }
        }
    }
}

/// Supported output formats for rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table output.
    #[default]
    Human,
    /// Pretty-printed JSON.
    Json,
}

/// Unknown output format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format '{0}' (expected 'human' or 'json')")]
pub struct UnknownFormat(pub String);

impl std::str::FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}
