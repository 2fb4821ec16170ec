//! Configuration models for the scheduler.

pub mod scheduler;

pub use scheduler::{
    SchedulerConfig, ShutdownPolicy, DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_NAME_PREFIX,
    DEFAULT_THREAD_STACK_SIZE, ENV_PREFIX, MIN_THREAD_STACK_SIZE,
};
