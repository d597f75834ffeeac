//! Bounded fan-out/fan-in over the units of one inventory stage.

use anyhow::Context;
use rayon::prelude::*;

use crate::error::{NetverError, Result, UnitFailure};
use crate::ui::progress::StageProgress;

/// A fixed-size pool running the units of a stage concurrently.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    show_progress: bool,
}

impl WorkerPool {
    /// A pool of `jobs` workers; 0 means one per available CPU.
    pub fn new(jobs: usize, show_progress: bool) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("netver-worker-{}", i))
            .build()
            .context("Failed to build worker pool")?;
        Ok(Self {
            pool,
            show_progress,
        })
    }

    pub fn jobs(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` over every unit and collect results in input order.
    ///
    /// A failing unit does not stop its siblings. If any unit fails, every
    /// failure is returned together as [`NetverError::StageFailed`], each
    /// attributed with `label`.
    pub fn run<T, R, L, F>(
        &self,
        stage: &'static str,
        units: &[T],
        label: L,
        work: F,
    ) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        L: Fn(&T) -> String + Sync,
        F: Fn(&T) -> Result<R> + Sync,
    {
        if units.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("{}: {} unit(s) on {} worker(s)", stage, units.len(), self.jobs());
        let progress = StageProgress::new(stage, units.len() as u64, self.show_progress);

        let results: Vec<Result<R>> = self.pool.install(|| {
            units
                .par_iter()
                .map(|unit| {
                    progress.set_message(&label(unit));
                    let result = work(unit);
                    progress.inc();
                    result
                })
                .collect()
        });

        let mut outputs = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (unit, result) in units.iter().zip(results) {
            match result {
                Ok(output) => outputs.push(output),
                Err(error) => {
                    tracing::debug!("{} failed for {}: {}", stage, label(unit), error);
                    failures.push(UnitFailure {
                        unit: label(unit),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            progress.finish_success(&format!("{}: {} done", stage, units.len()));
            Ok(outputs)
        } else {
            progress.finish_error(&format!("{}: {} failed", stage, failures.len()));
            Err(NetverError::StageFailed { stage, failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn results_keep_input_order() {
        let pool = WorkerPool::new(4, false).unwrap();
        let units: Vec<u32> = (0..50).collect();

        let doubled = pool
            .run("double", &units, |u| u.to_string(), |u| Ok(u * 2))
            .unwrap();

        assert_eq!(doubled, units.iter().map(|u| u * 2).collect::<Vec<_>>());
    }

    #[test]
    fn failures_are_aggregated_without_cancelling_siblings() {
        let pool = WorkerPool::new(3, false).unwrap();
        let units: Vec<u32> = (0..10).collect();
        let ran = AtomicUsize::new(0);

        let err = pool
            .run(
                "probe",
                &units,
                |u| format!("unit {}", u),
                |u| {
                    ran.fetch_add(1, Ordering::SeqCst);
                    if u % 4 == 0 {
                        Err(NetverError::ProbeFailed {
                            runtime: format!("/rt/{}", u).into(),
                            code: Some(1),
                        })
                    } else {
                        Ok(*u)
                    }
                },
            )
            .unwrap_err();

        assert_eq!(ran.load(Ordering::SeqCst), 10);
        match err {
            NetverError::StageFailed { stage, failures } => {
                assert_eq!(stage, "probe");
                let units: Vec<&str> = failures.iter().map(|f| f.unit.as_str()).collect();
                assert_eq!(units, ["unit 0", "unit 4", "unit 8"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_stage_is_a_no_op() {
        let pool = WorkerPool::new(1, false).unwrap();
        let out: Vec<u32> = pool
            .run("noop", &Vec::<u32>::new(), |u| u.to_string(), |u| Ok(*u))
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_jobs_means_all_cpus() {
        let pool = WorkerPool::new(0, false).unwrap();
        assert!(pool.jobs() >= 1);
    }
}
