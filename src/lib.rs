//! # Prometheus Job Scheduler
//!
//! A concurrent, priority-ordered job scheduler: a bounded worker pool fed by a
//! single dispatch thread that drains a priority heap, with pause/resume control
//! and coordinated shutdown.
//!
//! ## Architecture
//!
//! ```text
//! add_job ──► PriorityHeap ──► Dispatcher ──► WorkQueue ──► Worker 1..N
//!             (min-heap,       (1 thread,     (bounded     (catch_unwind
//!              Mutex)           Condvar)       FIFO)        fault boundary)
//! ```
//!
//! - **PriorityHeap**: pending jobs, lowest priority value first, submission
//!   order within a priority
//! - **Dispatcher**: one thread; sleeps on a condition variable until a job is
//!   added, dispatch is resumed, or stop is requested (no polling)
//! - **WorkQueue**: bounded handoff; a full queue blocks only the dispatcher
//! - **Workers**: run job bodies to completion; a panicking job becomes a
//!   [`TaskFault`](core::TaskFault) report and the worker keeps going
//! - **Scheduler**: the owned handle exposing `add_job`, `pause`, `resume`,
//!   and `stop`, tracking live threads so `stop` returns only after every
//!   thread has exited
//!
//! ## Example
//!
//! ```rust,no_run
//! use prometheus_job_scheduler::config::{SchedulerConfig, ShutdownPolicy};
//! use prometheus_job_scheduler::core::Scheduler;
//!
//! let config = SchedulerConfig::new()
//!     .with_worker_count(4)
//!     .with_queue_capacity(100)
//!     .with_shutdown_policy(ShutdownPolicy::DrainPending);
//!
//! let scheduler = Scheduler::with_fault_handler(config, |fault| {
//!     eprintln!("job failed: {fault}");
//! })?;
//!
//! scheduler.add_job(|| println!("urgent"), 0)?;
//! scheduler.add_job(|| println!("eventually"), 10)?;
//!
//! scheduler.pause()?;
//! scheduler.resume()?;
//!
//! let report = scheduler.stop();
//! println!("completed {} jobs", report.completed_jobs);
//! # Ok::<(), prometheus_job_scheduler::core::SchedulerError>(())
//! ```
//!
//! For complete examples, see:
//! - `tests/scheduler_test.rs` - Full integration tests
//! - `demos/priority_demo.rs` - Runnable walkthrough (`cargo run --example priority_demo`)

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling components and the scheduler handle.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Shared utilities.
pub mod util;

pub use crate::config::{SchedulerConfig, ShutdownPolicy};
pub use crate::core::{Scheduler, SchedulerError, SchedulerState, ShutdownReport, TaskFault};
