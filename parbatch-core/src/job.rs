//! Job Outcomes
//!
//! A batch always completes with one outcome per index. A job that returns
//! an error (or panics) produces a `Failed` slot; the rest of the batch
//! keeps running.

use std::fmt;

/// Error produced by a job body.
///
/// Jobs are caller-supplied closures; from the executor's point of view a
/// failure is opaque apart from its message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct JobError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl JobError {
    /// Create a job error from any displayable value.
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<String> for JobError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for JobError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Result of running one job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome<T> {
    /// The job produced a value.
    Success(T),
    /// The job returned an error or panicked.
    Failed {
        /// Error or panic message.
        message: String,
    },
}

impl<T> JobOutcome<T> {
    /// Whether this outcome carries a value.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success(_))
    }

    /// The value, if the job succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            JobOutcome::Success(v) => Some(v),
            JobOutcome::Failed { .. } => None,
        }
    }

    /// Consume the outcome, returning the value if the job succeeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            JobOutcome::Success(v) => Some(v),
            JobOutcome::Failed { .. } => None,
        }
    }

    /// The failure message, if the job failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            JobOutcome::Success(_) => None,
            JobOutcome::Failed { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors() {
        let ok: JobOutcome<u32> = JobOutcome::Success(7);
        assert!(ok.is_success());
        assert_eq!(ok.value(), Some(&7));
        assert_eq!(ok.failure(), None);

        let bad: JobOutcome<u32> = JobOutcome::Failed {
            message: "no score".to_string(),
        };
        assert!(!bad.is_success());
        assert_eq!(bad.value(), None);
        assert_eq!(bad.failure(), Some("no score"));
        assert_eq!(bad.into_value(), None);
    }

    #[test]
    fn job_error_display() {
        let e = JobError::new("training diverged");
        assert_eq!(e.to_string(), "training diverged");
        let e: JobError = "bad fold".into();
        assert_eq!(e.message, "bad fold");
    }
}
