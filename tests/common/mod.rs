//! Instrumented executors shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dispatch_bench::{compute, BenchConfig, WorkExecutor, WorkSpec};
use parking_lot::Mutex;

pub fn pool_config(worker_threads: usize) -> BenchConfig {
    BenchConfig {
        worker_threads,
        thread_name_prefix: "it-worker".to_string(),
        ..BenchConfig::default()
    }
}

/// Range sum that counts how many times it actually ran.
#[derive(Debug, Default)]
pub struct CountingExecutor {
    executions: AtomicUsize,
}

impl CountingExecutor {
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl WorkExecutor for CountingExecutor {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        Ok(compute(spec))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Sleeps `work_factor` milliseconds and returns the factor, logging the order
/// in which units finished.
#[derive(Debug, Default)]
pub struct DelayedExecutor {
    finished: Mutex<Vec<i64>>,
}

impl DelayedExecutor {
    pub fn completion_order(&self) -> Vec<i64> {
        self.finished.lock().clone()
    }
}

impl WorkExecutor for DelayedExecutor {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        std::thread::sleep(Duration::from_millis(spec.work_factor as u64));
        self.finished.lock().push(spec.work_factor);
        Ok(spec.work_factor)
    }

    fn name(&self) -> &str {
        "delayed"
    }
}

/// Range sum that errors on one factor and panics on another.
#[derive(Debug)]
pub struct FaultyExecutor {
    pub fail_on: Option<i64>,
    pub panic_on: Option<i64>,
}

impl WorkExecutor for FaultyExecutor {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        if self.panic_on == Some(spec.work_factor) {
            panic!("injected panic for factor {}", spec.work_factor);
        }
        if self.fail_on == Some(spec.work_factor) {
            anyhow::bail!("injected failure for factor {}", spec.work_factor);
        }
        Ok(compute(spec))
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

/// Succeeds until the `fail_at`-th execution (1-based), which errors.
#[derive(Debug)]
pub struct FailAtExecutor {
    pub fail_at: usize,
    calls: AtomicUsize,
}

impl FailAtExecutor {
    pub fn new(fail_at: usize) -> Self {
        Self {
            fail_at,
            calls: AtomicUsize::new(0),
        }
    }
}

impl WorkExecutor for FailAtExecutor {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_at {
            anyhow::bail!("injected failure on call {call}");
        }
        Ok(compute(spec))
    }

    fn name(&self) -> &str {
        "fail_at"
    }
}

/// Returns the negated range sum, to exercise the positivity rule.
#[derive(Debug, Default)]
pub struct NegatingExecutor;

impl WorkExecutor for NegatingExecutor {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        Ok(-compute(spec))
    }

    fn name(&self) -> &str {
        "negating"
    }
}
