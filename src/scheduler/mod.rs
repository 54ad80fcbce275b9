//! # Task Scheduling Core
//!
//! Accepts units of synchronous work, runs each on a worker drawn from a shared
//! pool, and hands the caller a [`TaskHandle`] to suspend on.
//!
//! ## Dispatch modes
//!
//! - [`DispatchMode::WorkerPool`]: dedicated OS threads fed by a crossbeam
//!   MPMC queue (see [`pool`]).
//! - [`DispatchMode::BlockingRuntime`]: tokio's blocking thread pool via
//!   `spawn_blocking` on the runtime the scheduler was started in.
//!
//! Either way the calling flow never occupies a worker while it waits; the
//! only suspension points are [`Scheduler::await_task`],
//! [`Scheduler::await_all`] and [`Scheduler::yield_control`].
//!
//! ## Guarantees
//!
//! - Each successful `submit` runs the executor exactly once.
//! - Independent submissions may complete in any order.
//! - A failing or panicking unit only fails its own handle.
//! - There is no cancellation and no timeout: awaiting a unit that never
//!   finishes suspends forever.

mod execution;
pub mod handle;
mod metrics;
mod pool;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::config::{BenchConfig, DispatchMode};
use crate::error::{BenchError, Result};
use crate::work::{RangeSum, WorkExecutor, WorkSpec};

use execution::{execute_job, Job};
use pool::WorkerPool;

pub use handle::{task_pair, Batch, TaskCompleter, TaskHandle};
pub use metrics::SchedulerStats;

use metrics::SchedulerMetrics;

enum Backend {
    WorkerPool(WorkerPool),
    BlockingRuntime(Handle),
}

struct SchedulerInner<E> {
    backend: Backend,
    executor: Arc<E>,
    metrics: Arc<SchedulerMetrics>,
    next_task_id: AtomicU64,
}

/// Shared entry point for submitting work. Clones refer to the same pool.
pub struct Scheduler<E: WorkExecutor = RangeSum> {
    inner: Arc<SchedulerInner<E>>,
}

impl<E: WorkExecutor> Clone for Scheduler<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Scheduler<RangeSum> {
    /// Start a scheduler running the range-sum workload.
    pub fn start(config: &BenchConfig) -> Result<Self> {
        Self::with_executor(config, RangeSum)
    }
}

impl<E: WorkExecutor> Scheduler<E> {
    /// Start a scheduler with a custom executor.
    ///
    /// `BlockingRuntime` mode must be started from within a tokio runtime.
    pub fn with_executor(config: &BenchConfig, executor: E) -> Result<Self> {
        config.validate()?;

        let executor = Arc::new(executor);
        let metrics = Arc::new(SchedulerMetrics::default());

        let backend = match config.dispatch_mode {
            DispatchMode::WorkerPool => Backend::WorkerPool(WorkerPool::start(
                config.worker_threads,
                &config.thread_name_prefix,
                executor.clone(),
                metrics.clone(),
            )?),
            DispatchMode::BlockingRuntime => {
                let handle = Handle::try_current().map_err(|e| {
                    BenchError::Configuration(format!(
                        "blocking_runtime dispatch requires a tokio runtime: {e}"
                    ))
                })?;
                info!(
                    executor = executor.name(),
                    "Scheduler dispatching onto tokio blocking pool"
                );
                Backend::BlockingRuntime(handle)
            }
        };

        Ok(Self {
            inner: Arc::new(SchedulerInner {
                backend,
                executor,
                metrics,
                next_task_id: AtomicU64::new(1),
            }),
        })
    }

    /// Enqueue one unit of work and return immediately.
    ///
    /// Negative work factors are rejected here, before any worker is engaged.
    pub fn submit(&self, spec: WorkSpec) -> Result<TaskHandle> {
        spec.validate()?;

        let task_id = self.inner.next_task_id.fetch_add(1, Ordering::Relaxed);
        let (completer, handle) = task_pair(task_id);
        let job = Job { spec, completer };

        match &self.inner.backend {
            Backend::WorkerPool(pool) => pool.dispatch(job)?,
            Backend::BlockingRuntime(runtime) => {
                let executor = self.inner.executor.clone();
                let metrics = self.inner.metrics.clone();
                // Detached: the outcome travels through the completer, not the
                // JoinHandle.
                drop(runtime.spawn_blocking(move || {
                    execute_job(executor.as_ref(), &metrics, job);
                }));
            }
        }

        self.inner.metrics.record_submission();
        debug!(task_id, work_factor = spec.work_factor, "Work unit submitted");
        Ok(handle)
    }

    /// Submit several units together. Every spec is validated before the first
    /// one is dispatched.
    pub fn submit_batch<I>(&self, specs: I) -> Result<Batch>
    where
        I: IntoIterator<Item = WorkSpec>,
    {
        let specs: Vec<WorkSpec> = specs.into_iter().collect();
        for spec in &specs {
            spec.validate()?;
        }

        specs
            .into_iter()
            .map(|spec| self.submit(spec))
            .collect::<Result<Vec<_>>>()
            .map(Batch::new)
    }

    /// Suspend until `handle` completes and return its value or failure.
    pub async fn await_task(&self, handle: &TaskHandle) -> Result<i64> {
        handle.wait().await
    }

    /// Suspend until every member of `batch` completes. Values come back in
    /// submission order.
    pub async fn await_all(&self, batch: &Batch) -> Result<Vec<i64>> {
        batch.wait_all().await
    }

    /// Give other ready flows on this runtime a chance to run.
    pub async fn yield_control(&self) {
        tokio::task::yield_now().await;
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.metrics.snapshot()
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        match self.inner.backend {
            Backend::WorkerPool(_) => DispatchMode::WorkerPool,
            Backend::BlockingRuntime(_) => DispatchMode::BlockingRuntime,
        }
    }

    pub fn executor(&self) -> &E {
        self.inner.executor.as_ref()
    }

    /// Number of dedicated worker threads, or `None` when dispatching onto the
    /// runtime's blocking pool.
    pub fn worker_count(&self) -> Option<usize> {
        match &self.inner.backend {
            Backend::WorkerPool(pool) => Some(pool.worker_count()),
            Backend::BlockingRuntime(_) => None,
        }
    }

    /// Stop accepting work, let queued units finish and join the worker
    /// threads. Later submits fail with [`BenchError::SchedulerShutdown`].
    ///
    /// Blocks the calling thread while workers drain; call it outside async
    /// flows. A no-op in `BlockingRuntime` mode, where the runtime owns the
    /// threads.
    pub fn shutdown(&self) {
        if let Backend::WorkerPool(pool) = &self.inner.backend {
            pool.shutdown();
        }
    }
}

impl<E: WorkExecutor> std::fmt::Debug for Scheduler<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("executor", &self.inner.executor.name())
            .field("dispatch_mode", &self.dispatch_mode())
            .field("stats", &self.stats())
            .finish()
    }
}
