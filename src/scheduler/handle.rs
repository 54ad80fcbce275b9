//! # Task Handles
//!
//! A submitted unit is represented by two halves sharing one slot:
//!
//! ```text
//! TaskCompleter (worker, exactly one) ──fulfil──▶ [ OnceLock<outcome> + Notify ]
//!                                                         ▲
//! TaskHandle (caller, any number of clones) ──wait────────┘
//! ```
//!
//! The completer is consumed by `complete`, so a slot is written at most once.
//! A completer dropped without completing resolves the slot with an
//! "abandoned" failure, which keeps waiters from hanging on work that will
//! never run.

use std::fmt;
use std::sync::{Arc, OnceLock};

use futures::future::join_all;
use tokio::sync::Notify;

use crate::error::{Result, TaskFailure};

pub(crate) type Outcome = std::result::Result<i64, TaskFailure>;

struct TaskSlot {
    task_id: u64,
    outcome: OnceLock<Outcome>,
    completed: Notify,
}

impl TaskSlot {
    fn fulfil(&self, outcome: Outcome) {
        // The release store in OnceLock::set pairs with the acquire load in get,
        // so every waiter woken below observes the outcome.
        if self.outcome.set(outcome).is_ok() {
            self.completed.notify_waiters();
        }
    }
}

/// Create the write and read halves for a new unit of work.
pub fn task_pair(task_id: u64) -> (TaskCompleter, TaskHandle) {
    let slot = Arc::new(TaskSlot {
        task_id,
        outcome: OnceLock::new(),
        completed: Notify::new(),
    });
    (
        TaskCompleter {
            slot: Some(slot.clone()),
        },
        TaskHandle { slot },
    )
}

/// Write half of a task slot. Owned by whichever worker runs the unit.
pub struct TaskCompleter {
    slot: Option<Arc<TaskSlot>>,
}

impl TaskCompleter {
    pub fn task_id(&self) -> u64 {
        self.slot.as_ref().map_or(0, |slot| slot.task_id)
    }

    pub fn complete(mut self, outcome: std::result::Result<i64, TaskFailure>) {
        if let Some(slot) = self.slot.take() {
            slot.fulfil(outcome);
        }
    }
}

impl Drop for TaskCompleter {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.fulfil(Err(TaskFailure::abandoned(slot.task_id)));
        }
    }
}

impl fmt::Debug for TaskCompleter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCompleter")
            .field("task_id", &self.task_id())
            .finish()
    }
}

/// Read half of a task slot. Clones share the same result.
#[derive(Clone)]
pub struct TaskHandle {
    slot: Arc<TaskSlot>,
}

impl TaskHandle {
    pub fn task_id(&self) -> u64 {
        self.slot.task_id
    }

    pub fn is_complete(&self) -> bool {
        self.slot.outcome.get().is_some()
    }

    /// The outcome if the unit already finished, without suspending.
    pub fn try_result(&self) -> Option<Result<i64>> {
        self.slot
            .outcome
            .get()
            .map(|outcome| outcome.clone().map_err(Into::into))
    }

    /// Suspend the calling flow until the unit finishes.
    ///
    /// Safe to call repeatedly and from many flows at once; every caller sees
    /// the same value or the same failure.
    pub async fn wait(&self) -> Result<i64> {
        loop {
            let notified = self.slot.completed.notified();
            tokio::pin!(notified);
            // Register interest before checking the slot so a completion racing
            // with this check still wakes us.
            notified.as_mut().enable();

            if let Some(result) = self.try_result() {
                return result;
            }

            notified.await;
        }
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task_id", &self.slot.task_id)
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// Handles submitted together and awaited jointly.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    handles: Vec<TaskHandle>,
}

impl Batch {
    pub fn new(handles: Vec<TaskHandle>) -> Self {
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[TaskHandle] {
        &self.handles
    }

    /// The most recently submitted member.
    pub fn last(&self) -> Option<&TaskHandle> {
        self.handles.last()
    }

    pub fn is_complete(&self) -> bool {
        self.handles.iter().all(TaskHandle::is_complete)
    }

    /// Wait for every member and return the per-member outcomes in submission
    /// order.
    pub async fn outcomes(&self) -> Vec<Result<i64>> {
        join_all(self.handles.iter().map(TaskHandle::wait)).await
    }

    /// Wait for every member and return their values in submission order.
    ///
    /// All members are awaited even when one fails; the first failure in
    /// submission order is then returned.
    pub async fn wait_all(&self) -> Result<Vec<i64>> {
        self.outcomes().await.into_iter().collect()
    }
}

impl FromIterator<TaskHandle> for Batch {
    fn from_iter<I: IntoIterator<Item = TaskHandle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
