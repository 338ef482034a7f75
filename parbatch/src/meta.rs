//! Batch Metadata
//!
//! Caller-supplied tagging for a batch. The executor passes it through
//! untouched and attaches it to the returned batch record. The options are
//! an enumerated, typed structure rather than a string-keyed bag, so an
//! unrecognized key is a compile (or deserialize) error instead of a silent
//! typo.

use serde::{Deserialize, Serialize};

/// Label plus options attached to one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchMeta {
    /// Human-readable batch label, carried into reports and log output.
    pub label: String,
    /// Typed run options.
    #[serde(default)]
    pub options: BatchOptions,
}

impl BatchMeta {
    /// Metadata with a label and default options.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            options: BatchOptions::default(),
        }
    }
}

/// Recognized per-batch options.
///
/// All fields are optional with serde defaults; unknown keys are rejected
/// at deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BatchOptions {
    /// Emit per-job debug output after the batch.
    #[serde(default)]
    pub verbose: bool,
    /// Free-text note carried alongside the results.
    #[serde(default)]
    pub note: Option<String>,
    /// Seed forwarded to job bodies that want reproducible randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}
