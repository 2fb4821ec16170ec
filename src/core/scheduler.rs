//! Public scheduler handle: composes the priority heap, dispatcher, work
//! queue, and worker pool, and owns their lifecycle.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher::{spawn_dispatcher, DispatchControl};
use super::lifecycle::{LiveThreads, SchedulerState};
use super::stats::{SchedulerCounters, SchedulerStats, ShutdownReport};
use super::work_queue::WorkQueue;
use super::worker_pool::{panic_message, FaultHandler, WorkerContext, WorkerPool};
use super::SchedulerError;
use crate::config::SchedulerConfig;
use crate::util::types::{JobId, Priority};

/// Priority job scheduler with a bounded worker pool.
///
/// Jobs enter a min-priority heap; one dispatcher thread moves them, lowest
/// priority value first (ties in submission order), into a bounded work
/// queue drained by `worker_count` worker threads.
///
/// The handle is the sole owner of the scheduler; there is no global
/// instance. Dropping it without calling [`stop`](Self::stop) requests
/// shutdown but does not wait for the threads.
///
/// # Example
///
/// ```
/// use prometheus_job_scheduler::core::Scheduler;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let scheduler = Scheduler::new(2)?;
/// let done = Arc::new(AtomicUsize::new(0));
///
/// for priority in [5, 1, 3] {
///     let done = Arc::clone(&done);
///     scheduler.add_job(move || { done.fetch_add(1, Ordering::SeqCst); }, priority)?;
/// }
///
/// # while scheduler.stats().completed_jobs < 3 { std::thread::yield_now(); }
/// let report = scheduler.stop();
/// assert_eq!(report.completed_jobs, 3);
/// # Ok::<(), prometheus_job_scheduler::core::SchedulerError>(())
/// ```
pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    instance_id: Uuid,
    config: SchedulerConfig,
    control: Arc<DispatchControl>,
    queue: Arc<WorkQueue>,
    counters: Arc<SchedulerCounters>,
    live: Arc<LiveThreads>,
    /// Taken by the first `stop` call, which joins them.
    threads: Mutex<Option<Threads>>,
    /// Dispatcher and worker thread ids, kept after `threads` is taken.
    thread_ids: Vec<ThreadId>,
}

struct Threads {
    dispatcher: JoinHandle<()>,
    workers: WorkerPool,
}

impl Scheduler {
    /// Start a scheduler with `worker_count` workers and default settings.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfiguration` if `worker_count` is 0
    /// - `SchedulerError::Spawn` if a thread cannot be started
    pub fn new(worker_count: usize) -> Result<Self, SchedulerError> {
        Self::with_config(SchedulerConfig::new().with_worker_count(worker_count))
    }

    /// Start a scheduler from a full configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        Self::start(config, None)
    }

    /// Start a scheduler that hands every task fault to `handler`.
    ///
    /// The handler runs on the worker that caught the fault; a panic inside
    /// it is contained and logged.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_fault_handler<F>(config: SchedulerConfig, handler: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&super::TaskFault) + Send + Sync + 'static,
    {
        Self::start(config, Some(Arc::new(handler)))
    }

    fn start(
        config: SchedulerConfig,
        fault_handler: Option<FaultHandler>,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;

        let instance_id = Uuid::new_v4();
        let control = Arc::new(DispatchControl::default());
        let queue = Arc::new(WorkQueue::new(config.queue_capacity));
        let counters = Arc::new(SchedulerCounters::default());
        let live = Arc::new(LiveThreads::new());

        let ctx = WorkerContext {
            queue: Arc::clone(&queue),
            counters: Arc::clone(&counters),
            fault_handler,
        };
        let workers = match WorkerPool::spawn(
            config.worker_count,
            &ctx,
            &live,
            &config.thread_name_prefix,
            config.thread_stack_size,
        ) {
            Ok(workers) => workers,
            Err((started, err)) => {
                queue.close();
                started.join();
                return Err(err);
            }
        };

        let dispatcher = match spawn_dispatcher(
            Arc::clone(&control),
            Arc::clone(&queue),
            Arc::clone(&counters),
            config.shutdown_policy,
            live.register(),
            format!("{}-dispatcher", config.thread_name_prefix),
            config.thread_stack_size,
        ) {
            Ok(handle) => handle,
            Err(err) => {
                control.request_stop();
                queue.close();
                workers.join();
                return Err(err);
            }
        };

        let thread_ids = std::iter::once(dispatcher.thread().id())
            .chain(workers.thread_ids())
            .collect();

        info!(
            scheduler = %instance_id,
            worker_count = config.worker_count,
            queue_capacity = config.queue_capacity,
            shutdown_policy = ?config.shutdown_policy,
            "Scheduler started"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                instance_id,
                config,
                control,
                queue,
                counters,
                live,
                threads: Mutex::new(Some(Threads { dispatcher, workers })),
                thread_ids,
            }),
        })
    }

    /// Add a job. Lower `priority` values are dispatched sooner; equal
    /// priorities are dispatched in submission order.
    ///
    /// Never waits on running jobs; only briefly on the heap lock.
    ///
    /// # Errors
    ///
    /// `SchedulerError::SchedulerClosed` once stop has been requested.
    pub fn add_job<F>(&self, task: F, priority: Priority) -> Result<JobId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ensure_open()?;
        let inner = &self.inner;
        // Count before the job becomes visible to the dispatcher.
        inner.counters.submitted_jobs.fetch_add(1, Ordering::AcqRel);
        let id = inner.control.submit(priority, task).inspect_err(|_| {
            inner.counters.submitted_jobs.fetch_sub(1, Ordering::AcqRel);
        })?;
        debug!(scheduler = %inner.instance_id, job_id = id, priority, "Job added");
        Ok(id)
    }

    /// Suppress dispatch from the priority heap. Idempotent.
    ///
    /// Jobs already queued or running are unaffected.
    ///
    /// # Errors
    ///
    /// `SchedulerError::SchedulerClosed` once stop has been requested.
    pub fn pause(&self) -> Result<(), SchedulerError> {
        self.ensure_open()?;
        if !self.inner.control.set_paused(true) {
            info!(scheduler = %self.inner.instance_id, "Scheduler paused");
        }
        Ok(())
    }

    /// Resume dispatch. Idempotent.
    ///
    /// # Errors
    ///
    /// `SchedulerError::SchedulerClosed` once stop has been requested.
    pub fn resume(&self) -> Result<(), SchedulerError> {
        self.ensure_open()?;
        if self.inner.control.set_paused(false) {
            info!(scheduler = %self.inner.instance_id, "Scheduler resumed");
        }
        Ok(())
    }

    /// Stop the scheduler and wait for the dispatcher and every worker to exit.
    ///
    /// Jobs already in the work queue or running finish first. Jobs still in
    /// the priority heap are discarded under
    /// [`ShutdownPolicy::DropPending`](crate::config::ShutdownPolicy) or
    /// dispatched under `DrainPending`; either way the report accounts for
    /// them. Waits as long as the longest job in flight.
    ///
    /// Idempotent: repeated or concurrent calls wait for the same shutdown
    /// and return the same report.
    ///
    /// Called from inside a job, `stop` requests shutdown and returns at
    /// once with the counters so far; it does not wait, since the calling
    /// worker cannot exit until its job returns. A `stop` on any other
    /// thread still waits for every scheduler thread, including that one.
    pub fn stop(&self) -> ShutdownReport {
        self.inner.stop()
    }

    /// Async variant of [`stop`](Self::stop); the blocking wait runs on
    /// tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Internal` if the blocking task is cancelled or panics.
    #[cfg(feature = "tokio-runtime")]
    pub async fn stop_async(&self) -> Result<ShutdownReport, SchedulerError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.stop())
            .await
            .map_err(|e| SchedulerError::Internal(format!("shutdown task failed: {e}")))
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.inner.state()
    }

    /// Whether dispatch is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.control.is_paused()
    }

    /// Jobs waiting in the priority heap.
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.inner.control.heap.lock().len()
    }

    /// Scheduler threads that have not yet exited.
    #[must_use]
    pub fn live_threads(&self) -> usize {
        self.inner.live.count()
    }

    /// Snapshot of scheduler activity.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let inner = &self.inner;
        inner.counters.snapshot(
            inner.state(),
            inner.config.worker_count,
            self.pending_jobs(),
            inner.queue.len(),
        )
    }

    /// Configuration the scheduler was started with.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    fn ensure_open(&self) -> Result<(), SchedulerError> {
        if self.inner.state().is_open() {
            Ok(())
        } else {
            Err(SchedulerError::SchedulerClosed)
        }
    }
}

impl Inner {
    fn state(&self) -> SchedulerState {
        if self.control.stop.is_fired() {
            if self.live.count() == 0 {
                SchedulerState::Stopped
            } else {
                SchedulerState::Stopping
            }
        } else if self.control.is_paused() {
            SchedulerState::Paused
        } else {
            SchedulerState::Running
        }
    }

    fn stop(&self) -> ShutdownReport {
        if self.control.request_stop() {
            info!(scheduler = %self.instance_id, "Stopping scheduler");
        }

        // A job calling stop runs on one of our workers, which can neither
        // join itself nor wait for its own exit.
        if self.thread_ids.contains(&thread::current().id()) {
            debug!(
                scheduler = %self.instance_id,
                "Stop called from a scheduler thread; not waiting for shutdown"
            );
            return self.counters.report();
        }

        let threads = self.threads.lock().take();
        if let Some(Threads { dispatcher, workers }) = threads {
            let worker_count = workers.len();
            if let Err(payload) = dispatcher.join() {
                // Unreachable in practice; the queue must still close or
                // workers would never exit.
                warn!(panic = %panic_message(&*payload), "Dispatcher thread panicked");
                self.queue.close();
            }
            workers.join();
            self.live.wait_all();

            let report = self.counters.report();
            info!(
                scheduler = %self.instance_id,
                worker_count,
                completed = report.completed_jobs,
                failed = report.failed_jobs,
                dropped = report.dropped_jobs,
                "Scheduler stopped"
            );
            report
        } else {
            // Another caller owns the join; wait on the tracker instead.
            self.live.wait_all();
            self.counters.report()
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Signal shutdown but don't join; threads exit once in-flight jobs finish.
        if self.inner.control.request_stop() {
            debug!(
                scheduler = %self.inner.instance_id,
                "Scheduler dropped without explicit stop - threads will be detached"
            );
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("instance_id", &self.inner.instance_id)
            .field("state", &self.state())
            .field("worker_count", &self.inner.config.worker_count)
            .finish_non_exhaustive()
    }
}
