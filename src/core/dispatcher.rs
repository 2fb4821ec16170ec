//! Dispatcher thread: moves the lowest-priority-value job from the heap into
//! the work queue.
//!
//! The dispatcher sleeps on a `parking_lot::Condvar` paired with the heap
//! mutex. Every state change it cares about (a job added, resume, stop) is
//! made visible and then notified while holding that mutex, so no wakeup is
//! lost between the dispatcher's check and its wait.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use super::job::Job;
use super::lifecycle::{StopSignal, ThreadGuard};
use super::priority_heap::PriorityHeap;
use super::stats::SchedulerCounters;
use super::work_queue::WorkQueue;
use super::SchedulerError;
use crate::config::ShutdownPolicy;
use crate::util::clock::now_ms;
use crate::util::types::{JobId, Priority};

/// State shared between the controller and the dispatcher thread.
#[derive(Debug, Default)]
pub(crate) struct DispatchControl {
    /// Pending jobs. The only lock on the add/dispatch path.
    pub heap: Mutex<PriorityHeap>,
    /// Signaled on add, resume, and stop.
    pub wake: Condvar,
    pub paused: AtomicBool,
    pub stop: StopSignal,
    /// Last id handed out. Advanced only under the heap lock.
    last_job_id: AtomicU64,
}

impl DispatchControl {
    /// Assign the next job id, push the job, and wake the dispatcher,
    /// unless stop has been requested.
    ///
    /// Id assignment and the stop check both happen under the heap lock:
    /// ids follow push order, and a job is either accepted before the
    /// dispatcher's final sweep or rejected.
    pub fn submit<F>(&self, priority: Priority, task: F) -> Result<JobId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut heap = self.heap.lock();
        if self.stop.is_fired() {
            return Err(SchedulerError::SchedulerClosed);
        }
        let id = self.last_job_id.fetch_add(1, Ordering::Relaxed) + 1;
        heap.push(Job::new(id, priority, task));
        drop(heap);
        self.wake.notify_one();
        Ok(id)
    }

    /// Set the pause flag. Returns the previous value.
    pub fn set_paused(&self, paused: bool) -> bool {
        let was = self.paused.swap(paused, Ordering::AcqRel);
        if was && !paused {
            // Serialize with the dispatcher's check-then-wait.
            let _heap = self.heap.lock();
            self.wake.notify_all();
        }
        was
    }

    /// Fire the stop signal and wake the dispatcher.
    /// Returns `true` for the call that fired it.
    pub fn request_stop(&self) -> bool {
        let first = self.stop.fire();
        let _heap = self.heap.lock();
        self.wake.notify_all();
        first
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Block until a job may be dispatched, or return `None` when the
    /// dispatcher should exit.
    fn next_job(&self, policy: ShutdownPolicy) -> Option<Job> {
        let mut heap = self.heap.lock();
        loop {
            if self.stop.is_fired() {
                return match policy {
                    ShutdownPolicy::DrainPending => heap.pop_min(),
                    ShutdownPolicy::DropPending => None,
                };
            }
            if !self.is_paused() {
                if let Some(job) = heap.pop_min() {
                    return Some(job);
                }
            }
            self.wake.wait(&mut heap);
        }
    }
}

/// Spawn the dispatcher thread.
pub(crate) fn spawn_dispatcher(
    control: Arc<DispatchControl>,
    queue: Arc<WorkQueue>,
    counters: Arc<SchedulerCounters>,
    policy: ShutdownPolicy,
    guard: ThreadGuard,
    thread_name: String,
    stack_size: usize,
) -> Result<JoinHandle<()>, SchedulerError> {
    thread::Builder::new()
        .name(thread_name)
        .stack_size(stack_size)
        .spawn(move || {
            let _guard = guard;
            run_dispatcher(&control, &queue, &counters, policy);
        })
        .map_err(|e| SchedulerError::Spawn(format!("dispatcher: {e}")))
}

fn run_dispatcher(
    control: &DispatchControl,
    queue: &WorkQueue,
    counters: &SchedulerCounters,
    policy: ShutdownPolicy,
) {
    info!(?policy, "Dispatcher started");

    while let Some(job) = control.next_job(policy) {
        let job_id = job.id();
        debug!(
            job_id,
            priority = job.priority(),
            waited_ms = now_ms().saturating_sub(job.created_at_ms()),
            "Dispatching job"
        );
        // Blocks while the queue is full; backpressure stops here.
        if let Err(job) = queue.push(job) {
            warn!(job_id = job.id(), "Work queue closed under dispatcher; job discarded");
            counters.dropped_jobs.fetch_add(1, Ordering::AcqRel);
            break;
        }
        counters.dispatched_jobs.fetch_add(1, Ordering::AcqRel);
    }

    let discarded = control.heap.lock().drain();
    if !discarded.is_empty() {
        let first = discarded.first().map(Job::priority);
        counters
            .dropped_jobs
            .fetch_add(discarded.len() as u64, Ordering::AcqRel);
        warn!(
            dropped = discarded.len(),
            next_priority = ?first,
            "Discarding pending jobs at shutdown"
        );
    }

    queue.close();
    info!("Dispatcher stopping");
}
