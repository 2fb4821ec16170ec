//! Prioritized unit of work.

use std::fmt;

use crate::util::clock::now_ms;
use crate::util::types::{JobId, Priority};

/// Boxed job body. Runs once, on a worker thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A unit of work with a priority and a callable body.
///
/// Lower priority values are dispatched sooner. A job is immutable once
/// built; its body is consumed by [`Job::run`].
pub struct Job {
    id: JobId,
    priority: Priority,
    created_at_ms: u128,
    task: Task,
}

impl Job {
    /// Build a job from an identifier, a priority, and a body.
    pub fn new<F>(id: JobId, priority: Priority, task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            priority,
            created_at_ms: now_ms(),
            task: Box::new(task),
        }
    }

    /// Identifier assigned at submission.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Priority value; lower runs first.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Creation timestamp in milliseconds since epoch.
    #[must_use]
    pub const fn created_at_ms(&self) -> u128 {
        self.created_at_ms
    }

    /// Consume the job and run its body on the calling thread.
    pub fn run(self) {
        (self.task)();
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("created_at_ms", &self.created_at_ms)
            .finish_non_exhaustive()
    }
}
