//! The three benchmark drivers.
//!
//! Each driver yields once before doing anything so the benchmark start is
//! decoupled from synchronous execution on the caller's stack. None of them
//! catch task failures: the first failing unit aborts the run.

use tracing::trace;

use crate::constants::FAN_OUT_BATCH_SIZE;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::work::{WorkExecutor, WorkSpec};

/// Submit and await a baseline unit, then `loop_count` more units one at a
/// time, discarding their results. Returns the baseline if positive, else 0.
pub async fn sequential<E: WorkExecutor>(
    scheduler: &Scheduler<E>,
    work_factor: i64,
    loop_count: u64,
) -> Result<i64> {
    let spec = WorkSpec::new(work_factor);
    scheduler.yield_control().await;

    let baseline = scheduler.submit(spec)?;
    scheduler.await_task(&baseline).await?;

    for _ in 0..loop_count {
        let handle = scheduler.submit(spec)?;
        scheduler.await_task(&handle).await?;
    }

    // Completed handles stay readable; this never suspends.
    let value = scheduler.await_task(&baseline).await?;
    Ok(positive_or_zero(value))
}

/// Like [`sequential`], but the loop counts down from `loop_count` to 1 and
/// only submits when the counter is even.
pub async fn conditional<E: WorkExecutor>(
    scheduler: &Scheduler<E>,
    work_factor: i64,
    loop_count: u64,
) -> Result<i64> {
    let spec = WorkSpec::new(work_factor);
    scheduler.yield_control().await;

    let baseline = scheduler.submit(spec)?;
    scheduler.await_task(&baseline).await?;

    let mut remaining = loop_count;
    while remaining > 0 {
        if remaining % 2 == 0 {
            let handle = scheduler.submit(spec)?;
            scheduler.await_task(&handle).await?;
        } else {
            trace!(counter = remaining, "Skipping submission on odd counter");
        }
        remaining -= 1;
    }

    let value = scheduler.await_task(&baseline).await?;
    Ok(positive_or_zero(value))
}

/// Submit [`FAN_OUT_BATCH_SIZE`] units at once, wait for all of them and
/// return the last one's value as is. `loop_count` plays no part.
pub async fn fan_out<E: WorkExecutor>(scheduler: &Scheduler<E>, work_factor: i64) -> Result<i64> {
    let spec = WorkSpec::new(work_factor);
    scheduler.yield_control().await;

    let batch = scheduler.submit_batch(std::iter::repeat(spec).take(FAN_OUT_BATCH_SIZE))?;
    let values = scheduler.await_all(&batch).await?;

    Ok(values.last().copied().unwrap_or_default())
}

fn positive_or_zero(value: i64) -> i64 {
    if value > 0 {
        value
    } else {
        0
    }
}
