//! Scheduler configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Default capacity of the dispatcher-to-worker handoff queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
/// Default stack size for scheduler threads (2 MiB).
pub const DEFAULT_THREAD_STACK_SIZE: usize = 2 * 1024 * 1024;
/// Smallest stack size accepted by [`SchedulerConfig::validate`].
pub const MIN_THREAD_STACK_SIZE: usize = 64 * 1024;
/// Default prefix for scheduler thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "job-scheduler";
/// Prefix for environment variables read by [`SchedulerConfig::from_env`].
pub const ENV_PREFIX: &str = "JOB_SCHEDULER_";

/// What happens to jobs still in the priority heap when stop is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Discard pending jobs. Jobs already in the work queue still run.
    #[default]
    DropPending,
    /// Dispatch every pending job before closing the work queue.
    /// Overrides pause once stop has been requested.
    DrainPending,
}

impl FromStr for ShutdownPolicy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" | "drop_pending" => Ok(Self::DropPending),
            "drain" | "drain_pending" => Ok(Self::DrainPending),
            other => Err(SchedulerError::InvalidConfiguration(format!(
                "unknown shutdown policy `{other}`"
            ))),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of worker threads. Must be at least 1.
    pub worker_count: usize,
    /// Capacity of the work queue between dispatcher and workers.
    pub queue_capacity: usize,
    /// Treatment of pending jobs at shutdown.
    pub shutdown_policy: ShutdownPolicy,
    /// Stack size in bytes for the dispatcher and worker threads.
    pub thread_stack_size: usize,
    /// Prefix for thread names (`<prefix>-dispatcher`, `<prefix>-worker-<n>`).
    pub thread_name_prefix: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get().max(1),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown_policy: ShutdownPolicy::default(),
            thread_stack_size: DEFAULT_THREAD_STACK_SIZE,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Defaults: one worker per CPU, queue capacity 100, drop-on-stop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the work queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Set the shutdown policy.
    #[must_use]
    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }

    /// Set the thread stack size in bytes.
    #[must_use]
    pub fn with_thread_stack_size(mut self, bytes: usize) -> Self {
        self.thread_stack_size = bytes;
        self
    }

    /// Set the thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfiguration` naming the first bad field.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.worker_count == 0 {
            return Err(invalid("worker_count must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity must be at least 1"));
        }
        if self.thread_stack_size < MIN_THREAD_STACK_SIZE {
            return Err(invalid(format!(
                "thread_stack_size must be at least {MIN_THREAD_STACK_SIZE} bytes"
            )));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(invalid("thread_name_prefix must not be empty"));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfiguration` on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| invalid(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `JOB_SCHEDULER_*` environment variables,
    /// loading a `.env` file first if one is present.
    ///
    /// Recognized: `WORKER_COUNT`, `QUEUE_CAPACITY`, `SHUTDOWN_POLICY`,
    /// `THREAD_STACK_SIZE`, `THREAD_NAME_PREFIX`. Unset variables keep defaults.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfiguration` if a variable does not
    /// parse or the result fails validation.
    pub fn from_env() -> Result<Self, SchedulerError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `lookup` receives full variable names (e.g. `JOB_SCHEDULER_WORKER_COUNT`).
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut cfg = Self::default();

        if let Some(v) = var("WORKER_COUNT") {
            cfg.worker_count = parse_usize("WORKER_COUNT", &v)?;
        }
        if let Some(v) = var("QUEUE_CAPACITY") {
            cfg.queue_capacity = parse_usize("QUEUE_CAPACITY", &v)?;
        }
        if let Some(v) = var("SHUTDOWN_POLICY") {
            cfg.shutdown_policy = v.parse()?;
        }
        if let Some(v) = var("THREAD_STACK_SIZE") {
            cfg.thread_stack_size = parse_usize("THREAD_STACK_SIZE", &v)?;
        }
        if let Some(v) = var("THREAD_NAME_PREFIX") {
            cfg.thread_name_prefix = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn invalid(msg: impl Into<String>) -> SchedulerError {
    SchedulerError::InvalidConfiguration(msg.into())
}

fn parse_usize(name: &str, value: &str) -> Result<usize, SchedulerError> {
    value
        .trim()
        .parse()
        .map_err(|e| invalid(format!("{ENV_PREFIX}{name}=`{value}`: {e}")))
}
