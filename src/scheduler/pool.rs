//! # Worker Pool
//!
//! A fixed set of OS threads draining one shared dispatch queue.
//!
//! ```text
//! submit ─┐                      ┌─▶ bench-worker-0 ─┐
//! submit ─┼─▶ [ crossbeam MPMC ] ├─▶ bench-worker-1 ─┼─▶ TaskCompleter::complete
//! submit ─┘       (unbounded)    └─▶ bench-worker-N ─┘
//! ```
//!
//! The queue is unbounded so `submit` never blocks the calling flow. Each job is
//! received by exactly one worker. Shutdown drops the sender; workers finish
//! whatever is still queued and exit once the channel reports disconnection.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::execution::{execute_job, Job};
use super::metrics::SchedulerMetrics;
use crate::error::{BenchError, Result};
use crate::work::WorkExecutor;

pub(crate) struct WorkerPool {
    dispatch_sender: RwLock<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
    thread_name_prefix: String,
}

impl WorkerPool {
    pub(crate) fn start<E: WorkExecutor>(
        worker_count: usize,
        thread_name_prefix: &str,
        executor: Arc<E>,
        metrics: Arc<SchedulerMetrics>,
    ) -> Result<Self> {
        if worker_count == 0 {
            return Err(BenchError::Configuration(
                "worker pool needs at least one worker thread".to_string(),
            ));
        }

        let (sender, receiver) = channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let receiver = receiver.clone();
            let executor = executor.clone();
            let metrics = metrics.clone();

            let spawned = thread::Builder::new()
                .name(format!("{thread_name_prefix}-{index}"))
                .spawn(move || worker_loop(index, receiver, executor.as_ref(), &metrics));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    // Disconnect and reap whatever already started before bailing.
                    drop(sender);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(BenchError::Io(e));
                }
            }
        }

        info!(
            worker_count,
            thread_name_prefix,
            executor = executor.name(),
            "Worker pool started"
        );

        Ok(Self {
            dispatch_sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
            worker_count,
            thread_name_prefix: thread_name_prefix.to_string(),
        })
    }

    pub(crate) fn dispatch(&self, job: Job) -> Result<()> {
        let guard = self.dispatch_sender.read();
        let sender = guard.as_ref().ok_or(BenchError::SchedulerShutdown)?;
        // A rejected job is dropped here, which resolves its handle as abandoned.
        sender
            .send(job)
            .map_err(|_| BenchError::SchedulerShutdown)
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub(crate) fn queued(&self) -> usize {
        self.dispatch_sender.read().as_ref().map_or(0, Sender::len)
    }

    /// Close the queue and join every worker. Queued jobs still run first.
    /// Idempotent.
    pub(crate) fn shutdown(&self) {
        let sender = self.dispatch_sender.write().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let workers: Vec<_> = std::mem::take(&mut *self.workers.lock());
        let current = thread::current().id();
        for worker in workers {
            if worker.thread().id() == current {
                // Last scheduler reference dropped on a worker thread; it exits
                // on its own once the channel drains.
                continue;
            }
            if worker.join().is_err() {
                warn!(
                    thread_name_prefix = %self.thread_name_prefix,
                    "Worker thread terminated abnormally"
                );
            }
        }

        info!(
            worker_count = self.worker_count,
            thread_name_prefix = %self.thread_name_prefix,
            "Worker pool stopped"
        );
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("queued", &self.queued())
            .finish()
    }
}

fn worker_loop<E: WorkExecutor>(
    index: usize,
    receiver: Receiver<Job>,
    executor: &E,
    metrics: &SchedulerMetrics,
) {
    debug!(worker = index, "Worker thread started");

    while let Ok(job) = receiver.recv() {
        execute_job(executor, metrics, job);
    }

    debug!(worker = index, "Worker thread exiting - dispatch queue closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::handle::task_pair;
    use crate::work::{RangeSum, WorkSpec};

    fn start_pool(workers: usize) -> (WorkerPool, Arc<SchedulerMetrics>) {
        let metrics = Arc::new(SchedulerMetrics::default());
        let pool = WorkerPool::start(workers, "pool-test", Arc::new(RangeSum), metrics.clone())
            .expect("pool should start");
        (pool, metrics)
    }

    #[test]
    fn test_zero_workers_rejected() {
        let metrics = Arc::new(SchedulerMetrics::default());
        let result = WorkerPool::start(0, "pool-test", Arc::new(RangeSum), metrics);
        assert!(matches!(result, Err(BenchError::Configuration(_))));
    }

    #[test]
    fn test_queued_jobs_drain_before_shutdown_returns() {
        let (pool, metrics) = start_pool(2);
        assert_eq!(pool.worker_count(), 2);

        let handles: Vec<_> = (0..50)
            .map(|id| {
                let (completer, handle) = task_pair(id);
                pool.dispatch(Job {
                    spec: WorkSpec::new(id as i64),
                    completer,
                })
                .unwrap();
                handle
            })
            .collect();

        pool.shutdown();

        for (id, handle) in handles.iter().enumerate() {
            let n = id as i64;
            assert_eq!(handle.try_result().unwrap().unwrap(), n * (n - 1) / 2);
        }
        assert_eq!(metrics.snapshot().completed, 50);
    }

    #[test]
    fn test_dispatch_after_shutdown_fails_and_abandons_handle() {
        let (pool, _metrics) = start_pool(1);
        pool.shutdown();
        pool.shutdown();

        let (completer, handle) = task_pair(1);
        let result = pool.dispatch(Job {
            spec: WorkSpec::new(1),
            completer,
        });

        assert!(matches!(result, Err(BenchError::SchedulerShutdown)));
        assert!(handle.try_result().unwrap().is_err());
        assert_eq!(pool.queued(), 0);
    }

    #[test]
    fn test_worker_pool_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkerPool>();
    }
}
