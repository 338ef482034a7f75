#![warn(missing_docs)]
//! Parbatch Core - Execution Primitives
//!
//! This crate provides the building blocks of the parallel batch executor:
//! - `WorkerPool` for bounded-concurrency fan-out over job indices
//! - `ResultCollector` for order-preserving result aggregation
//! - `StopWatch` for wall-clock batch timing
//! - `JobOutcome` so a single failed job never aborts a batch

mod collector;
mod job;
mod pool;
mod timing;

pub use collector::{CollectorError, ResultCollector};
pub use job::{JobError, JobOutcome};
pub use pool::{PoolError, WorkerPool};
pub use timing::StopWatch;

/// Zero-based identifier of one unit of work within a batch.
///
/// Unique per `map` call; every index in `[0, N)` is claimed by exactly one
/// worker and processed exactly once.
pub type JobIndex = usize;
