#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dispatch Bench
//!
//! Measures the latency and throughput overhead of pushing small units of
//! CPU-bound work through an async task scheduler.
//!
//! ## Overview
//!
//! A benchmark run generates a deterministic workload, submits it through the
//! scheduler's suspend/resume machinery in one of three shapes and returns an
//! integer so the caller can check correctness alongside wall-clock time.
//! Statistical reporting and runner wiring live outside this crate; criterion
//! benches under `benches/` are one such caller.
//!
//! ## Module Organization
//!
//! - [`work`] - The work unit (`WorkSpec`) and the pure range-sum computation
//! - [`scheduler`] - Worker pool, task handles, batches and submission
//! - [`orchestration`] - Sequential, conditional and fan-out drivers
//! - [`runner`] - Synchronous entry point owning a runtime and a scheduler
//! - [`config`] - Layered configuration (defaults, file, environment)
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dispatch_bench::{BenchConfig, BenchRunner, Pattern};
//!
//! # fn example() -> dispatch_bench::Result<()> {
//! let runner = BenchRunner::new(BenchConfig::default())?;
//!
//! for pattern in Pattern::ALL {
//!     let value = runner.run(pattern, 1_000, 100)?;
//!     assert_eq!(value, pattern.expected_result(1_000));
//! }
//!
//! runner.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the scheduler directly
//!
//! ```rust,no_run
//! use dispatch_bench::{BenchConfig, Scheduler, WorkSpec};
//!
//! # async fn example() -> dispatch_bench::Result<()> {
//! let scheduler = Scheduler::start(&BenchConfig::default())?;
//!
//! let handle = scheduler.submit(WorkSpec::new(100))?;
//! assert_eq!(scheduler.await_task(&handle).await?, 4950);
//!
//! let batch = scheduler.submit_batch((0..10).map(WorkSpec::new))?;
//! let values = scheduler.await_all(&batch).await?;
//! assert_eq!(values.len(), 10);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod runner;
pub mod scheduler;
pub mod work;

pub use crate::config::{BenchConfig, DispatchMode, RuntimeFlavor};
pub use error::{BenchError, Result, TaskFailure};
pub use orchestration::{run, Pattern};
pub use runner::BenchRunner;
pub use scheduler::{Batch, Scheduler, SchedulerStats, TaskHandle};
pub use work::{compute, RangeSum, WorkExecutor, WorkSpec};
