//! Worker pool: N dedicated OS threads draining the work queue.
//!
//! # Design Principles
//!
//! - **No polling**: workers block on the queue; closing it unblocks them
//! - **Fault boundary**: a panicking job is caught, reported, and counted;
//!   the worker keeps serving subsequent jobs
//! - **Clean shutdown**: workers drain what is already queued, then exit

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use tracing::{debug, error, warn};

use super::job::Job;
use super::lifecycle::LiveThreads;
use super::stats::SchedulerCounters;
use super::work_queue::WorkQueue;
use super::{SchedulerError, TaskFault};

/// Callback invoked with every [`TaskFault`], on the worker that caught it.
pub type FaultHandler = Arc<dyn Fn(&TaskFault) + Send + Sync + 'static>;

/// Handles to the spawned worker threads.
pub(crate) struct WorkerPool {
    workers: Vec<(usize, JoinHandle<()>)>,
}

/// Everything a worker thread needs, cloned per worker.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub queue: Arc<WorkQueue>,
    pub counters: Arc<SchedulerCounters>,
    pub fault_handler: Option<FaultHandler>,
}

impl WorkerPool {
    /// Spawn `worker_count` workers named `<prefix>-worker-<id>`, ids from 1.
    ///
    /// On a spawn failure the workers already started are returned inside
    /// the error path's pool so the caller can close the queue and join them.
    pub fn spawn(
        worker_count: usize,
        ctx: &WorkerContext,
        live: &Arc<LiveThreads>,
        name_prefix: &str,
        stack_size: usize,
    ) -> Result<Self, (Self, SchedulerError)> {
        let mut pool = Self {
            workers: Vec::with_capacity(worker_count),
        };

        for worker_id in 1..=worker_count {
            let ctx = ctx.clone();
            let guard = live.register();
            let spawned = thread::Builder::new()
                .name(format!("{name_prefix}-worker-{worker_id}"))
                .stack_size(stack_size)
                .spawn(move || {
                    let _guard = guard;
                    run_worker(worker_id, &ctx);
                });

            match spawned {
                Ok(handle) => pool.workers.push((worker_id, handle)),
                Err(e) => {
                    let err = SchedulerError::Spawn(format!("worker {worker_id}: {e}"));
                    return Err((pool, err));
                }
            }
        }

        Ok(pool)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn thread_ids(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.workers.iter().map(|(_, handle)| handle.thread().id())
    }

    /// Join every worker. Workers exit once the queue is closed and drained.
    pub fn join(self) {
        for (worker_id, handle) in self.workers {
            match handle.join() {
                Ok(()) => debug!(worker_id, "Worker joined successfully"),
                Err(_) => warn!(worker_id, "Worker thread panicked outside the fault boundary"),
            }
        }
    }
}

fn run_worker(worker_id: usize, ctx: &WorkerContext) {
    debug!(worker_id, "Worker started");

    // Blocking pop; `None` means closed and drained.
    while let Some(job) = ctx.queue.pop() {
        ctx.counters.active_jobs.fetch_add(1, Ordering::AcqRel);

        let job_id = job.id();
        let priority = job.priority();
        debug!(worker_id, job_id, priority, "Worker starting job");

        match execute(job) {
            Ok(()) => {
                ctx.counters.completed_jobs.fetch_add(1, Ordering::AcqRel);
                debug!(worker_id, job_id, "Worker finished job");
            }
            Err(message) => {
                ctx.counters.failed_jobs.fetch_add(1, Ordering::AcqRel);
                let fault = TaskFault {
                    job_id,
                    priority,
                    worker_id,
                    message,
                };
                error!(
                    worker_id,
                    job_id,
                    priority,
                    panic = %fault.message,
                    "Job panicked; worker continues"
                );
                report_fault(ctx.fault_handler.as_ref(), &fault);
            }
        }

        ctx.counters.active_jobs.fetch_sub(1, Ordering::AcqRel);
    }

    debug!(worker_id, "Worker shutting down");
}

/// Run a job body, converting a panic into its message.
fn execute(job: Job) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| job.run())).map_err(|payload| panic_message(&*payload))
}

fn report_fault(handler: Option<&FaultHandler>, fault: &TaskFault) {
    let Some(handler) = handler else {
        return;
    };
    if panic::catch_unwind(AssertUnwindSafe(|| handler(fault))).is_err() {
        error!(job_id = fault.job_id, "Fault handler panicked");
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
