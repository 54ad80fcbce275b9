//! # Work Generator
//!
//! The unit of CPU-bound work pushed through the scheduler. A [`WorkSpec`] fully
//! determines the computation; [`compute`] is pure and safe to call from any
//! number of workers at once.
//!
//! The scheduler never calls [`compute`] directly. It goes through the
//! [`WorkExecutor`] trait so alternative workloads (and instrumented ones in
//! tests) can be plugged in without touching the dispatch path.

use std::hint::black_box;

use crate::error::{BenchError, Result};

/// Immutable description of one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkSpec {
    pub work_factor: i64,
}

impl WorkSpec {
    pub const fn new(work_factor: i64) -> Self {
        Self { work_factor }
    }

    /// Reject specs that cannot be executed. Called by the scheduler at submit
    /// time, before any worker sees the unit.
    pub fn validate(&self) -> Result<()> {
        if self.work_factor < 0 {
            return Err(BenchError::InvalidWorkSpec {
                work_factor: self.work_factor,
            });
        }
        Ok(())
    }
}

/// Sum the first `work_factor` non-negative integers.
///
/// Every element passes through `black_box` so the loop cannot be folded into
/// the closed form; the cost stays proportional to the factor.
pub fn compute(spec: &WorkSpec) -> i64 {
    (0..spec.work_factor).fold(0i64, |acc, n| acc.wrapping_add(black_box(n)))
}

/// Executes a single unit of work on a scheduler worker.
pub trait WorkExecutor: Send + Sync + 'static {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64>;

    fn name(&self) -> &str;
}

/// Production executor: the range sum from [`compute`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeSum;

impl WorkExecutor for RangeSum {
    fn execute(&self, spec: &WorkSpec) -> anyhow::Result<i64> {
        Ok(compute(spec))
    }

    fn name(&self) -> &str {
        "range_sum"
    }
}
