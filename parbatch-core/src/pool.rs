//! Worker Pool
//!
//! Bounded-concurrency fan-out over a batch of job indices. The pool spawns
//! `W.min(N)` scoped worker threads that pull indices from a shared claim
//! cursor; the assignment of indices to workers is not fixed up front, which
//! tolerates highly uneven per-job cost (training one model can take far
//! longer than another).

use crate::JobIndex;
use crate::collector::{CollectorError, ResultCollector};
use crate::job::{JobError, JobOutcome};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Errors from pool configuration or dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Worker count below one; rejected before any job runs.
    #[error("invalid worker count {workers}: a pool needs at least one worker")]
    InvalidConfig {
        /// The rejected worker count.
        workers: usize,
    },

    /// Result collection detected an invariant violation mid-batch.
    #[error("result collection failed: {0}")]
    Collection(#[from] CollectorError),
}

/// Fixed-size pool of concurrent execution units.
///
/// The worker count is fixed for the duration of one `map` call and may be
/// changed between calls via [`WorkerPool::configure`]. The pool holds no
/// per-batch state, so one pool can serve many batches.
#[derive(Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with `workers` concurrent execution units.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        if workers < 1 {
            return Err(PoolError::InvalidConfig { workers });
        }
        Ok(Self { workers })
    }

    /// Set the number of concurrent execution units for future `map` calls.
    ///
    /// Idempotent: reconfiguring to the current count changes nothing.
    pub fn configure(&mut self, workers: usize) -> Result<(), PoolError> {
        if workers < 1 {
            return Err(PoolError::InvalidConfig { workers });
        }
        self.workers = workers;
        Ok(())
    }

    /// Configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job_fn` for every index in `[0, jobs)` across at most
    /// `workers` concurrent threads, blocking until every job completes.
    ///
    /// Results are ordered by job index regardless of completion order. A
    /// job that returns an error or panics yields a [`JobOutcome::Failed`]
    /// slot; the rest of the batch still runs. There is no per-job timeout:
    /// a hung job blocks the whole batch.
    ///
    /// `jobs == 0` returns an empty vector without spawning any threads; if
    /// `workers` exceeds `jobs`, only `jobs` threads are spawned.
    pub fn map<T, F>(&self, jobs: usize, job_fn: F) -> Result<Vec<JobOutcome<T>>, PoolError>
    where
        T: Send + Sync,
        F: Fn(JobIndex) -> Result<T, JobError> + Sync,
    {
        if jobs == 0 {
            return Ok(Vec::new());
        }

        let active = self.workers.min(jobs);
        let cursor = AtomicUsize::new(0);
        let collector = ResultCollector::new(jobs);
        // First collector fault wins; workers drain and exit once it is set.
        let fault: OnceLock<CollectorError> = OnceLock::new();

        thread::scope(|scope| {
            for worker_id in 0..active {
                let cursor = &cursor;
                let collector = &collector;
                let fault = &fault;
                let job_fn = &job_fn;
                scope.spawn(move || {
                    let span = tracing::debug_span!("worker", id = worker_id);
                    let _entered = span.enter();
                    loop {
                        if fault.get().is_some() {
                            break;
                        }
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        if index >= jobs {
                            break;
                        }
                        tracing::trace!(index, "job claimed");
                        let outcome = run_job(job_fn, index);
                        if let Err(e) = collector.put(index, outcome) {
                            tracing::error!(index, error = %e, "result publish failed");
                            let _ = fault.set(e);
                            break;
                        }
                    }
                });
            }
        });

        if let Some(fault) = fault.into_inner() {
            return Err(fault.into());
        }
        collector.drain().map_err(Into::into)
    }
}

/// Invoke one job, converting an `Err` return or a panic into a failed slot.
fn run_job<T, F>(job_fn: &F, index: JobIndex) -> JobOutcome<T>
where
    F: Fn(JobIndex) -> Result<T, JobError>,
{
    match catch_unwind(AssertUnwindSafe(|| job_fn(index))) {
        Ok(Ok(value)) => JobOutcome::Success(value),
        Ok(Err(e)) => {
            tracing::debug!(index, error = %e, "job failed");
            JobOutcome::Failed {
                message: e.message,
            }
        }
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::debug!(index, panic = %message, "job panicked");
            JobOutcome::Failed { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn rejects_zero_workers() {
        assert_eq!(
            WorkerPool::new(0).unwrap_err(),
            PoolError::InvalidConfig { workers: 0 }
        );
        let mut pool = WorkerPool::new(2).unwrap();
        assert_eq!(
            pool.configure(0),
            Err(PoolError::InvalidConfig { workers: 0 })
        );
        // A failed configure leaves the old count in place.
        assert_eq!(pool.workers(), 2);
    }

    #[test]
    fn configure_is_idempotent() {
        let mut pool = WorkerPool::new(3).unwrap();
        pool.configure(3).unwrap();
        assert_eq!(pool.workers(), 3);
        let first = pool.map(6, |i| Ok(i)).unwrap();
        pool.configure(3).unwrap();
        let second = pool.map(6, |i| Ok(i)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_batch_runs_no_jobs() {
        let pool = WorkerPool::new(4).unwrap();
        let calls = AtomicUsize::new(0);
        let results = pool
            .map(0, |i| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            })
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn more_workers_than_jobs() {
        let pool = WorkerPool::new(16).unwrap();
        let calls = AtomicUsize::new(0);
        let results = pool
            .map(3, |i| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(i * 10)
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            results,
            vec![
                JobOutcome::Success(0),
                JobOutcome::Success(10),
                JobOutcome::Success(20)
            ]
        );
    }

    #[test]
    fn every_index_processed_exactly_once() {
        let pool = WorkerPool::new(4).unwrap();
        let per_index: Vec<AtomicUsize> = (0..100).map(|_| AtomicUsize::new(0)).collect();
        let results = pool
            .map(100, |i| {
                per_index[i].fetch_add(1, Ordering::SeqCst);
                Ok(i)
            })
            .unwrap();
        assert_eq!(results.len(), 100);
        for counter in &per_index {
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn results_ordered_despite_uneven_job_cost() {
        let pool = WorkerPool::new(4).unwrap();
        let results = pool
            .map(12, |i| {
                // Early indices sleep longest so completion order inverts
                // submission order.
                std::thread::sleep(Duration::from_millis((12 - i) as u64 * 3));
                Ok(i * i)
            })
            .unwrap();
        for (i, outcome) in results.iter().enumerate() {
            assert_eq!(outcome.value(), Some(&(i * i)));
        }
    }

    #[test]
    fn concurrency_never_exceeds_worker_budget() {
        let pool = WorkerPool::new(3).unwrap();
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        pool.map(24, |i| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(i)
        })
        .unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn failed_job_does_not_abort_batch() {
        let pool = WorkerPool::new(2).unwrap();
        let results = pool
            .map(5, |i| {
                if i == 2 {
                    Err(JobError::new("no score for index 2"))
                } else {
                    Ok(i)
                }
            })
            .unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[2].failure(), Some("no score for index 2"));
        assert_eq!(results[4].value(), Some(&4));
    }

    #[test]
    fn panicking_job_becomes_failed_slot() {
        let pool = WorkerPool::new(2).unwrap();
        let results = pool
            .map(4, |i| {
                if i == 1 {
                    panic!("fold evaluation blew up");
                }
                Ok(i)
            })
            .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[1].failure(), Some("fold evaluation blew up"));
        assert!(results[0].is_success());
        assert!(results[3].is_success());
    }

    #[test]
    fn single_worker_runs_everything() {
        let pool = WorkerPool::new(1).unwrap();
        let results = pool.map(8, |i| Ok(i + 1)).unwrap();
        let values: Vec<usize> = results.into_iter().filter_map(|o| o.into_value()).collect();
        assert_eq!(values, (1..=8).collect::<Vec<_>>());
    }
}
