//! Runs one unit of work on whichever thread the dispatch backend picked and
//! publishes the outcome through the unit's completer.
//!
//! Executor errors and panics are both turned into a [`TaskFailure`] on that
//! unit only; the worker thread survives and keeps draining the queue.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{error, trace};

use super::handle::TaskCompleter;
use super::metrics::SchedulerMetrics;
use crate::error::TaskFailure;
use crate::work::{WorkExecutor, WorkSpec};

/// A queued unit of work.
#[derive(Debug)]
pub(crate) struct Job {
    pub(crate) spec: WorkSpec,
    pub(crate) completer: TaskCompleter,
}

pub(crate) fn execute_job<E: WorkExecutor + ?Sized>(
    executor: &E,
    metrics: &SchedulerMetrics,
    job: Job,
) {
    let Job { spec, completer } = job;
    let task_id = completer.task_id();

    match catch_unwind(AssertUnwindSafe(|| executor.execute(&spec))) {
        Ok(Ok(value)) => {
            trace!(
                task_id,
                work_factor = spec.work_factor,
                value,
                "Work unit completed"
            );
            metrics.record_completion();
            completer.complete(Ok(value));
        }
        Ok(Err(work_error)) => {
            error!(
                task_id,
                executor = executor.name(),
                work_factor = spec.work_factor,
                error = %work_error,
                "Work unit returned error"
            );
            metrics.record_failure();
            completer.complete(Err(TaskFailure::new(task_id, format!("{work_error:#}"))));
        }
        Err(panic_payload) => {
            let panic_msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };

            error!(
                task_id,
                executor = executor.name(),
                work_factor = spec.work_factor,
                panic_msg = %panic_msg,
                "Work unit panicked"
            );
            metrics.record_panic();
            completer.complete(Err(TaskFailure::new(
                task_id,
                format!("executor panicked: {panic_msg}"),
            )));
        }
    }
}
