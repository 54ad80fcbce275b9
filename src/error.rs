//! Error types for the dispatch benchmark core.

use thiserror::Error;

/// A fault raised while a worker executed a unit of work.
///
/// Stored on the task handle and handed out to every waiter, so it has to be
/// cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Task {task_id} failed: {message}")]
pub struct TaskFailure {
    pub task_id: u64,
    pub message: String,
}

impl TaskFailure {
    pub fn new(task_id: u64, message: impl Into<String>) -> Self {
        Self {
            task_id,
            message: message.into(),
        }
    }

    /// Failure recorded when a unit is dropped without ever running.
    pub fn abandoned(task_id: u64) -> Self {
        Self::new(task_id, "work unit was dropped before it executed")
    }
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid work spec: work_factor must be non-negative, got {work_factor}")]
    InvalidWorkSpec { work_factor: i64 },

    #[error(transparent)]
    TaskFailure(#[from] TaskFailure),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Scheduler has been shut down")]
    SchedulerShutdown,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for BenchError {
    fn from(error: config::ConfigError) -> Self {
        BenchError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
