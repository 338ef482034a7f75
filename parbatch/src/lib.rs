#![warn(missing_docs)]
//! # Parbatch
//!
//! Bounded-concurrency parallel batch executor: give it N job indices, a
//! job function and a worker budget W, and it runs every job exactly once
//! across at most W concurrent workers, returning results in job-index
//! order together with elapsed wall-clock time.
//!
//! - **Dynamic job distribution**: workers pull indices from a shared
//!   cursor, so wildly uneven per-job cost (one model trains for minutes,
//!   another for seconds) never idles the pool early
//! - **Order-preserving collection**: `result[i]` is `jobFn(i)` regardless
//!   of the nondeterministic completion order
//! - **Failure containment**: a job that errors or panics yields a failed
//!   slot; the rest of the batch completes
//! - **Scoped output gating**: informational output is silenced for exactly
//!   the parallel phase through a per-executor RAII guard, never a
//!   process-global flag
//! - **Reusable facade**: one `ParallelExecutor` serves many batches with
//!   different worker budgets
//!
//! ## Quick Start
//!
//! ```
//! use parbatch::{BatchMeta, ParallelExecutor};
//!
//! let mut executor = ParallelExecutor::new(2).unwrap();
//! let batch = executor
//!     .execute(5, 2, |i| Ok(i * i), BatchMeta::labeled("squares"))
//!     .unwrap();
//! let values: Vec<usize> = batch.values().copied().collect();
//! assert_eq!(values, vec![0, 1, 4, 9, 16]);
//! ```
//!
//! ## Cross-Validation Folds
//!
//! ```
//! use parbatch::{BatchMeta, ParallelExecutor};
//!
//! let mut executor = ParallelExecutor::new(4).unwrap();
//! let folds = executor
//!     .execute_folds(4, 4, |fold| Ok(0.70 + fold as f64 / 100.0),
//!                    BatchMeta::labeled("cv"))
//!     .unwrap();
//! assert!(folds.mean.unwrap() > 0.70);
//! ```

mod config;
mod executor;
mod gate;
mod meta;

pub use config::{OutputSettings, RunnerSettings, Settings};
pub use executor::{BatchResults, ExecutorError, FoldResults, ParallelExecutor};
pub use gate::{OutputGate, SilenceGuard};
pub use meta::{BatchMeta, BatchOptions};

// Re-export core types callers need to write job functions and consume
// outcomes.
pub use parbatch_core::{JobError, JobIndex, JobOutcome, PoolError, StopWatch, WorkerPool};

// Re-export the report surface.
pub use parbatch_report::{
    BatchReport, OutputFormat, ReportMeta, ScoreRow, UnknownFormat, format_fold_listing,
    format_score_table,
};
