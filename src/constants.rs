//! Shared constants for the benchmark core.

/// Number of units submitted by the fan-out pattern.
pub const FAN_OUT_BATCH_SIZE: usize = 10;

pub const DEFAULT_WORK_FACTOR: i64 = 100;
pub const DEFAULT_LOOP_COUNT: u64 = 100;
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "bench-worker";

/// Environment variable names read by the config and logging layers.
pub mod env {
    /// Prefix for `BenchConfig` overrides, e.g. `DISPATCH_BENCH_WORKER_THREADS`.
    pub const CONFIG_PREFIX: &str = "DISPATCH_BENCH";
    pub const ENVIRONMENT: &str = "DISPATCH_BENCH_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    pub const LOG_FORMAT: &str = "DISPATCH_BENCH_LOG_FORMAT";
}
