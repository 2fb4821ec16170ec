//! Bounded FIFO handoff between the dispatcher and the workers.
//!
//! Built on `crossbeam_channel::bounded`. Closing drops the queue's sender:
//! consumers keep receiving whatever is still buffered and then observe the
//! disconnect, so close doubles as a "drain and exit" broadcast.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use super::job::Job;

/// Bounded, closable FIFO of jobs.
pub struct WorkQueue {
    /// Sender side. `None` once closed.
    tx: Mutex<Option<Sender<Job>>>,
    rx: Receiver<Job>,
    capacity: usize,
}

impl WorkQueue {
    /// Create a queue holding at most `capacity` jobs.
    ///
    /// A capacity of 0 makes every push a rendezvous with a popping worker.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
            capacity,
        }
    }

    /// Push a job, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Hands the job back if the queue has been closed.
    pub fn push(&self, job: Job) -> Result<(), Job> {
        // Clone out of the lock so a blocked push never holds it.
        let tx = self.tx.lock().clone();
        match tx {
            Some(tx) => tx.send(job).map_err(|err| err.into_inner()),
            None => Err(job),
        }
    }

    /// Pop the oldest job, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and fully drained.
    pub fn pop(&self) -> Option<Job> {
        self.rx.recv().ok()
    }

    /// Pop without blocking.
    pub fn try_pop(&self) -> Option<Job> {
        self.rx.try_recv().ok()
    }

    /// Close the queue. Returns `true` for the call that actually closed it.
    pub fn close(&self) -> bool {
        self.tx.lock().take().is_some()
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.lock().is_none()
    }

    /// Jobs currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no jobs are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of buffered jobs.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for WorkQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}
