//! Parallel Executor Facade
//!
//! The entry point drives a reusable `WorkerPool` and a `StopWatch` through
//! one batch: reconfigure the pool, silence the output gate, time the
//! dispatch, and hand back order-preserving results plus elapsed time. The
//! facade persists across batches; only the worker budget changes between
//! calls.
//!
//! Two thin adapters cover the common call shapes: scored batches of
//! heterogeneous jobs (one label/detail/score record per job, reported as a
//! table) and homogeneous cross-validation folds (one score per fold plus
//! the arithmetic mean).

use crate::config::Settings;
use crate::gate::OutputGate;
use crate::meta::BatchMeta;
use parbatch_core::{JobError, JobIndex, JobOutcome, PoolError, StopWatch, WorkerPool};
use parbatch_report::{BatchReport, ReportMeta, ScoreRow, format_fold_listing, format_score_table};
use std::time::Duration;

/// Errors surfaced by the executor facade.
///
/// Per-job failures are not errors at this level; they appear as `Failed`
/// slots in the returned batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// Pool configuration or dispatch failed before a complete batch could
    /// be produced.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Everything one `execute` call produced.
#[derive(Debug)]
pub struct BatchResults<T> {
    /// Caller-supplied metadata, passed through untouched.
    pub meta: BatchMeta,
    /// Worker budget the batch ran with.
    pub workers: usize,
    /// Wall-clock duration of the whole batch.
    pub elapsed: Duration,
    /// One outcome per job, ordered by job index.
    pub outcomes: Vec<JobOutcome<T>>,
}

impl<T> BatchResults<T> {
    /// Number of jobs in the batch.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch contained no jobs.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of jobs that produced a value.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Iterate over the successful values in index order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(|o| o.value())
    }
}

impl BatchResults<ScoreRow> {
    /// Rows for reporting: successful jobs keep their row, failed jobs
    /// become a placeholder row carrying the failure message.
    pub fn rows(&self) -> Vec<ScoreRow> {
        self.outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                JobOutcome::Success(row) => row.clone(),
                JobOutcome::Failed { message } => {
                    ScoreRow::failed(format!("job {index}"), message.clone())
                }
            })
            .collect()
    }

    /// Build a serializable report for this batch.
    pub fn to_report(&self) -> BatchReport {
        BatchReport {
            meta: ReportMeta::new(
                self.meta.label.clone(),
                self.workers,
                self.elapsed.as_secs_f64() * 1000.0,
            ),
            rows: self.rows(),
            mean: None,
        }
    }
}

/// Results of a fold-mode batch.
#[derive(Debug)]
pub struct FoldResults {
    /// The underlying batch, one `f64` score per fold.
    pub batch: BatchResults<f64>,
    /// Arithmetic mean of the successful fold scores; `None` when every
    /// fold failed.
    pub mean: Option<f64>,
}

impl FoldResults {
    /// Per-fold scores in fold order, `None` for failed folds.
    pub fn scores(&self) -> Vec<Option<f64>> {
        self.batch
            .outcomes
            .iter()
            .map(|o| o.value().copied())
            .collect()
    }

    /// Build a serializable report for this batch.
    pub fn to_report(&self) -> BatchReport {
        let label = self.batch.meta.label.clone();
        BatchReport {
            meta: ReportMeta::new(
                label.clone(),
                self.batch.workers,
                self.batch.elapsed.as_secs_f64() * 1000.0,
            ),
            rows: self
                .batch
                .outcomes
                .iter()
                .enumerate()
                .map(|(fold, outcome)| match outcome {
                    JobOutcome::Success(score) => {
                        ScoreRow::scored(label.clone(), format!("fold {fold}"), *score)
                    }
                    JobOutcome::Failed { message } => {
                        ScoreRow::failed(format!("fold {fold}"), message.clone())
                    }
                })
                .collect(),
            mean: self.mean,
        }
    }
}

/// Drives batches of independent jobs across a bounded worker pool.
///
/// One instance owns its pool, stopwatch and output gate; reentrancy is
/// excluded by the `&mut self` receiver on `execute`, and distinct
/// instances are fully independent.
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: WorkerPool,
    stopwatch: StopWatch,
    gate: OutputGate,
    quiet_parallel: bool,
}

impl ParallelExecutor {
    /// Create an executor with an initial worker budget.
    pub fn new(workers: usize) -> Result<Self, ExecutorError> {
        Ok(Self {
            pool: WorkerPool::new(workers)?,
            stopwatch: StopWatch::new(),
            gate: OutputGate::new(),
            quiet_parallel: true,
        })
    }

    /// Create an executor from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ExecutorError> {
        let mut executor = Self::new(settings.runner.resolved_workers())?;
        executor.quiet_parallel = settings.runner.quiet;
        Ok(executor)
    }

    /// The facade's output gate.
    pub fn gate(&self) -> &OutputGate {
        &self.gate
    }

    /// Worker budget from the most recent configuration.
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Execute `jobs` independent jobs across at most `workers` concurrent
    /// workers, returning ordered outcomes plus elapsed wall-clock time.
    ///
    /// Fails only on an invalid worker count or an internal result
    /// collection fault; individual job failures are carried as `Failed`
    /// slots in the returned batch.
    pub fn execute<T, F>(
        &mut self,
        jobs: usize,
        workers: usize,
        job_fn: F,
        meta: BatchMeta,
    ) -> Result<BatchResults<T>, ExecutorError>
    where
        T: Send + Sync,
        F: Fn(JobIndex) -> Result<T, JobError> + Sync,
    {
        self.pool.configure(workers)?;
        self.stopwatch.reset();

        let outcomes = {
            // Guard keeps the gate silenced for exactly the parallel phase,
            // reopening it on every exit path including errors.
            let _quiet = self.quiet_parallel.then(|| self.gate.silence());
            self.stopwatch.start();
            let outcomes = self.pool.map(jobs, &job_fn);
            self.stopwatch.stop();
            outcomes
        }?;

        let elapsed = self.stopwatch.elapsed().unwrap_or_default();
        tracing::debug!(
            label = %meta.label,
            jobs,
            workers = self.pool.workers(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "batch complete"
        );

        Ok(BatchResults {
            meta,
            workers: self.pool.workers(),
            elapsed,
            outcomes,
        })
    }

    /// Execute a batch of heterogeneous scored jobs and report the results
    /// as a three-column table once the batch completes.
    pub fn execute_scored<F>(
        &mut self,
        jobs: usize,
        workers: usize,
        job_fn: F,
        meta: BatchMeta,
    ) -> Result<BatchResults<ScoreRow>, ExecutorError>
    where
        F: Fn(JobIndex) -> Result<ScoreRow, JobError> + Sync,
    {
        let batch = self.execute(jobs, workers, job_fn, meta)?;

        self.gate
            .info(&format_score_table(&batch.meta.label, &batch.rows()));
        if batch.meta.options.verbose {
            self.gate.info(&format!(
                "{} jobs, {} workers, {:.3} s elapsed",
                batch.len(),
                batch.workers,
                batch.elapsed.as_secs_f64()
            ));
        }

        Ok(batch)
    }

    /// Execute a batch of homogeneous cross-validation folds, log each fold
    /// score plus their arithmetic mean, and return both.
    ///
    /// Failed folds are excluded from the mean; if every fold failed the
    /// mean is `None`.
    pub fn execute_folds<F>(
        &mut self,
        folds: usize,
        workers: usize,
        job_fn: F,
        meta: BatchMeta,
    ) -> Result<FoldResults, ExecutorError>
    where
        F: Fn(JobIndex) -> Result<f64, JobError> + Sync,
    {
        let batch = self.execute(folds, workers, job_fn, meta)?;

        let successes: Vec<f64> = batch.values().copied().collect();
        let mean = if successes.is_empty() {
            None
        } else {
            Some(successes.iter().sum::<f64>() / successes.len() as f64)
        };

        let results = FoldResults { batch, mean };
        self.gate
            .info(&format_fold_listing(&results.scores(), results.mean));
        if results.mean.is_none() && !results.batch.is_empty() {
            self.gate.warn("every fold failed; no average score");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_returns_ordered_results() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        let batch = executor
            .execute(5, 2, |i| Ok(i * i), BatchMeta::labeled("squares"))
            .unwrap();
        let values: Vec<usize> = batch.values().copied().collect();
        assert_eq!(values, vec![0, 1, 4, 9, 16]);
        assert_eq!(batch.meta.label, "squares");
        assert_eq!(batch.workers, 2);
    }

    #[test]
    fn invalid_worker_count_rejected_before_any_job_runs() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        let ran = std::sync::atomic::AtomicBool::new(false);
        let result = executor.execute(
            3,
            0,
            |i| {
                ran.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(i)
            },
            BatchMeta::default(),
        );
        assert_eq!(
            result.unwrap_err(),
            ExecutorError::Pool(PoolError::InvalidConfig { workers: 0 })
        );
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn gate_reopens_after_each_batch() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        executor
            .execute(4, 2, |i| Ok(i), BatchMeta::default())
            .unwrap();
        assert!(!executor.gate().is_silenced());

        // Also after a batch with failing jobs.
        executor
            .execute(4, 2, |_: JobIndex| -> Result<usize, JobError> {
                Err(JobError::new("broken"))
            }, BatchMeta::default())
            .unwrap();
        assert!(!executor.gate().is_silenced());
    }

    #[test]
    fn settings_control_workers_and_quiet_mode() {
        let settings: Settings = toml::from_str(
            r#"
            [runner]
            workers = 3
            quiet = false
        "#,
        )
        .unwrap();
        let executor = ParallelExecutor::from_settings(&settings).unwrap();
        assert_eq!(executor.workers(), 3);
        assert!(!executor.quiet_parallel);
    }

    #[test]
    fn scored_batch_builds_report() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        let names = ["bdt", "mlp", "svm"];
        let batch = executor
            .execute_scored(
                3,
                2,
                |i| Ok(ScoreRow::scored("dataset", names[i], 0.8 + i as f64 / 100.0)),
                BatchMeta::labeled("factory"),
            )
            .unwrap();
        let report = batch.to_report();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[1].detail, "mlp");
        assert_eq!(report.rows[2].score, Some(0.82));
        assert_eq!(report.meta.label, "factory");
    }

    #[test]
    fn fold_mean_excludes_failures() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        let results = executor
            .execute_folds(
                4,
                2,
                |i| {
                    if i == 3 {
                        Err(JobError::new("fold 3 broke"))
                    } else {
                        Ok(0.6)
                    }
                },
                BatchMeta::labeled("cv"),
            )
            .unwrap();
        assert_eq!(results.mean, Some(0.6));
        assert_eq!(results.scores(), vec![Some(0.6), Some(0.6), Some(0.6), None]);
        let report = results.to_report();
        assert_eq!(report.mean, Some(0.6));
        assert_eq!(report.rows[3].score, None);
    }

    #[test]
    fn all_failed_folds_have_no_mean() {
        let mut executor = ParallelExecutor::new(2).unwrap();
        let results = executor
            .execute_folds(
                2,
                2,
                |_| Err(JobError::new("no data")),
                BatchMeta::labeled("cv"),
            )
            .unwrap();
        assert_eq!(results.mean, None);
    }
}
