//! # Benchmark Runner
//!
//! Synchronous entry point for external harnesses: owns the tokio runtime the
//! driver flows run on plus the scheduler they submit to, so a runner can call
//! [`BenchRunner::run`] in a tight timing loop.

use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::config::{BenchConfig, DispatchMode, RuntimeFlavor};
use crate::error::Result;
use crate::orchestration::{self, Pattern};
use crate::scheduler::{Scheduler, SchedulerStats};
use crate::work::{RangeSum, WorkExecutor};

pub struct BenchRunner<E: WorkExecutor = RangeSum> {
    config: BenchConfig,
    scheduler: Scheduler<E>,
    runtime: Runtime,
}

impl BenchRunner<RangeSum> {
    pub fn new(config: BenchConfig) -> Result<Self> {
        Self::with_executor(config, RangeSum)
    }

    /// Runner configured from `DISPATCH_BENCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(BenchConfig::from_env()?)
    }
}

impl<E: WorkExecutor> BenchRunner<E> {
    pub fn with_executor(config: BenchConfig, executor: E) -> Result<Self> {
        config.validate()?;

        let mut builder = match config.runtime_flavor {
            RuntimeFlavor::CurrentThread => Builder::new_current_thread(),
            RuntimeFlavor::MultiThread => Builder::new_multi_thread(),
        };
        builder
            .enable_all()
            .thread_name(format!("{}-driver", config.thread_name_prefix));
        if config.dispatch_mode == DispatchMode::BlockingRuntime {
            builder.max_blocking_threads(config.worker_threads);
        }
        let runtime = builder.build()?;

        // BlockingRuntime mode captures the handle of the runtime it starts in.
        let scheduler = {
            let _guard = runtime.enter();
            Scheduler::with_executor(&config, executor)?
        };

        info!(
            runtime_flavor = ?config.runtime_flavor,
            dispatch_mode = ?config.dispatch_mode,
            worker_threads = config.worker_threads,
            "Benchmark runner ready"
        );

        Ok(Self {
            config,
            scheduler,
            runtime,
        })
    }

    /// Run one pattern to completion on the runner's runtime.
    pub fn run(&self, pattern: Pattern, work_factor: i64, loop_count: u64) -> Result<i64> {
        self.runtime.block_on(orchestration::run(
            &self.scheduler,
            pattern,
            work_factor,
            loop_count,
        ))
    }

    /// Run one pattern with the configured work factor and loop count.
    pub fn run_configured(&self, pattern: Pattern) -> Result<i64> {
        self.run(pattern, self.config.work_factor, self.config.loop_count)
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler<E> {
        &self.scheduler
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Drain and join the worker pool, then tear down the runtime.
    pub fn shutdown(self) {
        self.scheduler.shutdown();
        drop(self.scheduler);
        self.runtime.shutdown_background();
    }
}

impl<E: WorkExecutor> std::fmt::Debug for BenchRunner<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchRunner")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
