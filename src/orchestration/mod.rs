//! # Benchmark Orchestration
//!
//! Drives the scheduler through one of three submission shapes:
//!
//! | Pattern       | Submissions             | Returns                     |
//! |---------------|-------------------------|-----------------------------|
//! | `sequential`  | `1 + loop_count`        | baseline if positive, else 0 |
//! | `conditional` | `1 + loop_count / 2`    | baseline if positive, else 0 |
//! | `fan_out`     | `10`                    | last batch member           |
//!
//! The workload is deterministic, so only timing and worker assignment vary
//! between runs.

pub mod patterns;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::constants::FAN_OUT_BATCH_SIZE;
use crate::error::{BenchError, Result};
use crate::scheduler::Scheduler;
use crate::work::{compute, WorkExecutor, WorkSpec};

pub use patterns::{conditional, fan_out, sequential};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Sequential,
    Conditional,
    FanOut,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Sequential, Pattern::Conditional, Pattern::FanOut];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Sequential => "sequential",
            Pattern::Conditional => "conditional",
            Pattern::FanOut => "fan_out",
        }
    }

    /// How many units one run of this pattern submits.
    pub fn expected_submissions(&self, loop_count: u64) -> u64 {
        match self {
            Pattern::Sequential => 1 + loop_count,
            // Even values in loop_count..=1
            Pattern::Conditional => 1 + loop_count / 2,
            Pattern::FanOut => FAN_OUT_BATCH_SIZE as u64,
        }
    }

    /// The value a run returns with the range-sum workload, for harnesses that
    /// check correctness alongside timing.
    pub fn expected_result(&self, work_factor: i64) -> i64 {
        let value = compute(&WorkSpec::new(work_factor));
        match self {
            Pattern::Sequential | Pattern::Conditional => value.max(0),
            Pattern::FanOut => value,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(Pattern::Sequential),
            "conditional" => Ok(Pattern::Conditional),
            "fan_out" | "fanout" => Ok(Pattern::FanOut),
            other => Err(BenchError::Configuration(format!(
                "Unknown pattern '{other}', expected one of: sequential, conditional, fan_out"
            ))),
        }
    }
}

/// Run one benchmark pattern to completion and return its aggregate value.
#[instrument(skip(scheduler), fields(executor = scheduler.executor().name()))]
pub async fn run<E: WorkExecutor>(
    scheduler: &Scheduler<E>,
    pattern: Pattern,
    work_factor: i64,
    loop_count: u64,
) -> Result<i64> {
    let result = match pattern {
        Pattern::Sequential => sequential(scheduler, work_factor, loop_count).await,
        Pattern::Conditional => conditional(scheduler, work_factor, loop_count).await,
        Pattern::FanOut => fan_out(scheduler, work_factor).await,
    };

    debug!(ok = result.is_ok(), "Benchmark pattern finished");
    result
}
