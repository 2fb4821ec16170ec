//! Error types for scheduler operations.

use std::fmt;

use thiserror::Error;

use crate::util::types::{JobId, Priority};

/// A panic captured at a worker's fault boundary.
///
/// The worker that produced it keeps running; the fault is logged, counted,
/// and handed to the scheduler's fault handler if one is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFault {
    /// Job whose body panicked.
    pub job_id: JobId,
    /// Priority the job was added with.
    pub priority: Priority,
    /// Worker that was executing the job (1-based).
    pub worker_id: usize,
    /// Panic payload rendered as text.
    pub message: String,
}

impl fmt::Display for TaskFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "job {} (priority {}) panicked on worker {}: {}",
            self.job_id, self.priority, self.worker_id, self.message
        )
    }
}

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration failed validation or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A job body panicked. Reported, never propagated to the process.
    #[error("task fault: {0}")]
    TaskFault(TaskFault),
    /// The scheduler has been stopped and accepts no further operations.
    #[error("scheduler closed")]
    SchedulerClosed,
    /// The OS refused to spawn a scheduler thread.
    #[error("failed to spawn thread: {0}")]
    Spawn(String),
    /// Internal failure (e.g. a blocking shutdown task was cancelled).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TaskFault> for SchedulerError {
    fn from(fault: TaskFault) -> Self {
        Self::TaskFault(fault)
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
