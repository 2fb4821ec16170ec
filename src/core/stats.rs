//! Scheduler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::lifecycle::SchedulerState;

/// Point-in-time view of scheduler activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Current lifecycle state.
    pub state: SchedulerState,
    /// Number of worker threads.
    pub worker_count: usize,
    /// Jobs waiting in the priority heap.
    pub pending_jobs: usize,
    /// Jobs handed to the work queue but not yet picked up by a worker.
    pub queued_jobs: usize,
    /// Jobs currently executing.
    pub active_jobs: u64,
    /// Jobs accepted by `add_job`.
    pub submitted_jobs: u64,
    /// Jobs moved from the priority heap to the work queue.
    pub dispatched_jobs: u64,
    /// Jobs whose body returned normally.
    pub completed_jobs: u64,
    /// Jobs whose body panicked.
    pub failed_jobs: u64,
    /// Jobs discarded at shutdown without running.
    pub dropped_jobs: u64,
}

/// Outcome of [`Scheduler::stop`](crate::core::Scheduler::stop).
///
/// Every accepted job is accounted for exactly once:
/// `submitted == completed + failed + dropped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShutdownReport {
    /// Jobs accepted over the scheduler's lifetime.
    pub submitted_jobs: u64,
    /// Jobs whose body returned normally.
    pub completed_jobs: u64,
    /// Jobs whose body panicked.
    pub failed_jobs: u64,
    /// Jobs still pending when stop took effect, discarded unrun.
    pub dropped_jobs: u64,
}

/// Internal counters (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub active_jobs: AtomicU64,
    pub submitted_jobs: AtomicU64,
    pub dispatched_jobs: AtomicU64,
    pub completed_jobs: AtomicU64,
    pub failed_jobs: AtomicU64,
    pub dropped_jobs: AtomicU64,
}

impl SchedulerCounters {
    /// Snapshot the counters; heap and queue depths come from the caller.
    pub fn snapshot(
        &self,
        state: SchedulerState,
        worker_count: usize,
        pending_jobs: usize,
        queued_jobs: usize,
    ) -> SchedulerStats {
        SchedulerStats {
            state,
            worker_count,
            pending_jobs,
            queued_jobs,
            active_jobs: self.active_jobs.load(Ordering::Relaxed),
            submitted_jobs: self.submitted_jobs.load(Ordering::Relaxed),
            dispatched_jobs: self.dispatched_jobs.load(Ordering::Relaxed),
            completed_jobs: self.completed_jobs.load(Ordering::Relaxed),
            failed_jobs: self.failed_jobs.load(Ordering::Relaxed),
            dropped_jobs: self.dropped_jobs.load(Ordering::Relaxed),
        }
    }

    pub fn report(&self) -> ShutdownReport {
        ShutdownReport {
            submitted_jobs: self.submitted_jobs.load(Ordering::Acquire),
            completed_jobs: self.completed_jobs.load(Ordering::Acquire),
            failed_jobs: self.failed_jobs.load(Ordering::Acquire),
            dropped_jobs: self.dropped_jobs.load(Ordering::Acquire),
        }
    }
}
