//! Batch Timing
//!
//! Wall-clock timing for a dispatch cycle, built on `std::time::Instant`.
//! Wall-clock rather than CPU time: the point is to measure the parallel
//! speedup the caller actually observes.

use std::time::{Duration, Instant};

/// Start/stop stopwatch wrapping one dispatch cycle.
///
/// Reusable across batches via `reset`.
#[derive(Debug, Default)]
pub struct StopWatch {
    started: Option<Instant>,
    elapsed: Option<Duration>,
}

impl StopWatch {
    /// Create a stopped stopwatch with no recorded measurement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear any prior measurement and stop the watch.
    pub fn reset(&mut self) {
        self.started = None;
        self.elapsed = None;
    }

    /// Record the start timestamp.
    ///
    /// Calling `start` while already running is a no-op; the original start
    /// point is kept.
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.elapsed = None;
            self.started = Some(Instant::now());
        }
    }

    /// Record the stop timestamp and fix the elapsed duration.
    ///
    /// A no-op if the watch was never started.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = Some(started.elapsed());
        }
    }

    /// Whether the watch is currently running.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// The fixed duration of the last completed start/stop cycle.
    ///
    /// `None` until `stop` has been called.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}
