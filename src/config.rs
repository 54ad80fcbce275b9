//! # Configuration
//!
//! Harness-facing settings for the scheduler and the benchmark drivers.
//!
//! Sources are layered with the `config` crate, later sources winning:
//!
//! 1. [`BenchConfig::default`]
//! 2. An optional TOML/YAML/JSON file
//! 3. `DISPATCH_BENCH_*` environment variables, e.g.
//!    `DISPATCH_BENCH_WORKER_THREADS=8` or
//!    `DISPATCH_BENCH_DISPATCH_MODE=blocking_runtime`
//!
//! The scheduler core never reads the environment itself; only these loaders do.

use std::num::NonZeroUsize;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    env, DEFAULT_LOOP_COUNT, DEFAULT_THREAD_NAME_PREFIX, DEFAULT_WORK_FACTOR,
};
use crate::error::{BenchError, Result};

/// Where submitted work units execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Dedicated worker threads fed by a shared MPMC queue
    #[default]
    WorkerPool,
    /// tokio's blocking thread pool via `spawn_blocking`
    BlockingRuntime,
}

/// Runtime the benchmark driver flows are polled on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFlavor {
    #[default]
    CurrentThread,
    MultiThread,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Worker threads in the dispatch pool. In `BlockingRuntime` mode this
    /// caps the runtime's blocking pool instead.
    pub worker_threads: usize,
    pub dispatch_mode: DispatchMode,
    pub runtime_flavor: RuntimeFlavor,
    pub thread_name_prefix: String,
    /// Default work factor for `BenchRunner::run_configured`
    pub work_factor: i64,
    /// Default loop count for `BenchRunner::run_configured`
    pub loop_count: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            dispatch_mode: DispatchMode::default(),
            runtime_flavor: RuntimeFlavor::default(),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            work_factor: DEFAULT_WORK_FACTOR,
            loop_count: DEFAULT_LOOP_COUNT,
        }
    }
}

impl BenchConfig {
    /// Defaults overridden by `DISPATCH_BENCH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(None, env::CONFIG_PREFIX)
    }

    /// Defaults, then `path`, then `DISPATCH_BENCH_*` environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_sources(Some(path), env::CONFIG_PREFIX)
    }

    /// Layer an optional file and the environment variables starting with
    /// `{env_prefix}_` over the defaults, then validate the result.
    pub fn from_sources(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: BenchConfig = builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(BenchError::Configuration(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        if self.work_factor < 0 {
            return Err(BenchError::Configuration(format!(
                "work_factor must be non-negative, got {}",
                self.work_factor
            )));
        }

        if self.thread_name_prefix.trim().is_empty() {
            return Err(BenchError::Configuration(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.dispatch_mode, DispatchMode::WorkerPool);
        assert_eq!(config.runtime_flavor, RuntimeFlavor::CurrentThread);
        assert_eq!(config.work_factor, DEFAULT_WORK_FACTOR);
        assert_eq!(config.loop_count, DEFAULT_LOOP_COUNT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = BenchConfig {
            worker_threads: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BenchError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_work_factor() {
        let config = BenchConfig {
            work_factor: -1,
            ..BenchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_thread_prefix() {
        let config = BenchConfig {
            thread_name_prefix: "  ".to_string(),
            ..BenchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        // Unique prefix so parallel tests never see these variables.
        std::env::set_var("CFG_UNIT_OVERRIDE_WORKER_THREADS", "3");
        std::env::set_var("CFG_UNIT_OVERRIDE_DISPATCH_MODE", "blocking_runtime");
        std::env::set_var("CFG_UNIT_OVERRIDE_LOOP_COUNT", "7");

        let config = BenchConfig::from_sources(None, "CFG_UNIT_OVERRIDE").unwrap();

        std::env::remove_var("CFG_UNIT_OVERRIDE_WORKER_THREADS");
        std::env::remove_var("CFG_UNIT_OVERRIDE_DISPATCH_MODE");
        std::env::remove_var("CFG_UNIT_OVERRIDE_LOOP_COUNT");

        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.dispatch_mode, DispatchMode::BlockingRuntime);
        assert_eq!(config.loop_count, 7);
        assert_eq!(config.work_factor, DEFAULT_WORK_FACTOR);
    }

    #[test]
    fn test_invalid_environment_value_is_configuration_error() {
        std::env::set_var("CFG_UNIT_INVALID_WORKER_THREADS", "0");
        let result = BenchConfig::from_sources(None, "CFG_UNIT_INVALID");
        std::env::remove_var("CFG_UNIT_INVALID_WORKER_THREADS");

        assert!(matches!(result, Err(BenchError::Configuration(_))));
    }
}
