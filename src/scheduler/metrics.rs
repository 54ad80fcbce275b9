//! # Scheduler Metrics
//!
//! Lock-free submission and completion counters. Every submit and every finished
//! unit touches these, so they are plain `AtomicU64`s with relaxed ordering.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time view of the scheduler counters.
///
/// Individual reads are atomic but the snapshot as a whole is not
/// transactionally consistent while work is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    /// Subset of `failed` caused by a panicking executor
    pub panicked: u64,
}

impl SchedulerStats {
    /// Units that were submitted but have not finished yet.
    pub fn in_flight(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

#[derive(Debug, Default)]
pub(crate) struct SchedulerMetrics {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

impl SchedulerMetrics {
    #[inline]
    pub(crate) fn record_submission(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_completion(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_panic(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_recorded_events() {
        let metrics = SchedulerMetrics::default();
        metrics.record_submission();
        metrics.record_submission();
        metrics.record_submission();
        metrics.record_completion();
        metrics.record_panic();

        let stats = metrics.snapshot();
        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.in_flight(), 1);
    }

    #[test]
    fn test_default_stats_are_empty() {
        let stats = SchedulerStats::default();
        assert_eq!(stats.in_flight(), 0);
    }
}
