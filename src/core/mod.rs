//! Core scheduling components: priority heap, dispatcher, work queue,
//! worker pool, and the scheduler handle that composes them.

mod dispatcher;
pub mod error;
pub mod job;
pub mod lifecycle;
pub mod priority_heap;
pub mod scheduler;
pub mod stats;
pub mod work_queue;
pub mod worker_pool;

pub use error::{AppResult, SchedulerError, TaskFault};
pub use job::{Job, Task};
pub use lifecycle::{LiveThreads, SchedulerState, StopSignal, ThreadGuard};
pub use priority_heap::PriorityHeap;
pub use scheduler::Scheduler;
pub use stats::{SchedulerStats, ShutdownReport};
pub use work_queue::WorkQueue;
pub use worker_pool::FaultHandler;
