//! Scheduler lifecycle: state machine, one-shot stop latch, and live-thread
//! tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

/// Observable scheduler state.
///
/// `Running` and `Paused` alternate freely; `Stopping` and `Stopped` are
/// reached once and never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// Dispatching pending jobs.
    Running,
    /// Dispatch suppressed; queued and running jobs are unaffected.
    Paused,
    /// Stop requested; threads are winding down.
    Stopping,
    /// All scheduler threads have exited.
    Stopped,
}

impl SchedulerState {
    /// Whether the scheduler still accepts jobs and control calls.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

/// One-shot stop indicator. Fires once; every later observer sees it set.
#[derive(Debug, Default)]
pub struct StopSignal {
    fired: AtomicBool,
}

impl StopSignal {
    /// Create an unfired signal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Counts live scheduler threads so callers can wait for all of them to exit.
#[derive(Debug, Default)]
pub struct LiveThreads {
    count: Mutex<usize>,
    all_exited: Condvar,
}

impl LiveThreads {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a thread before spawning it.
    ///
    /// The returned guard must move into the thread; dropping it (on return
    /// or unwind) marks the thread as exited.
    #[must_use = "dropping the guard immediately unregisters the thread"]
    pub fn register(self: &Arc<Self>) -> ThreadGuard {
        *self.count.lock() += 1;
        ThreadGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Threads registered and not yet exited.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Block until every registered thread has exited.
    pub fn wait_all(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.all_exited.wait(&mut count);
        }
    }

    fn exit_one(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.all_exited.notify_all();
        }
    }
}

/// Marks one registered thread as live until dropped.
#[derive(Debug)]
pub struct ThreadGuard {
    tracker: Arc<LiveThreads>,
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        self.tracker.exit_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_stop_signal_fires_once() {
        let signal = StopSignal::new();
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[test]
    fn test_stop_signal_concurrent_fire() {
        let signal = Arc::new(StopSignal::new());
        let winners: usize = (0..8)
            .map(|_| {
                let signal = Arc::clone(&signal);
                thread::spawn(move || usize::from(signal.fire()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .sum();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_live_threads_wait_all() {
        let tracker = Arc::new(LiveThreads::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let guard = tracker.register();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(10 * i));
                    drop(guard);
                })
            })
            .collect();

        assert!(tracker.count() <= 4);
        tracker.wait_all();
        assert_eq!(tracker.count(), 0);
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_guard_released_on_panic() {
        let tracker = Arc::new(LiveThreads::new());
        let guard = tracker.register();
        let handle = thread::spawn(move || {
            let _guard = guard;
            panic!("thread body failed");
        });
        assert!(handle.join().is_err());
        tracker.wait_all();
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_state_is_open() {
        assert!(SchedulerState::Running.is_open());
        assert!(SchedulerState::Paused.is_open());
        assert!(!SchedulerState::Stopping.is_open());
        assert!(!SchedulerState::Stopped.is_open());
    }
}
