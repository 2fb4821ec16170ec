//! Min-ordered heap of pending jobs.
//!
//! Backed by `std::collections::BinaryHeap` (an array-backed binary heap)
//! with an inverted ordering so the lowest priority value surfaces first.
//! Equal priorities are released in submission order (ascending job id).
//!
//! The heap itself is not synchronized; the scheduler keeps it behind a
//! single `parking_lot::Mutex` and holds that lock only across a push or pop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::job::Job;
use crate::util::types::Priority;

/// Orders jobs for a max-heap so that the minimum priority value wins,
/// with the earliest job id winning ties.
struct HeapEntry(Job);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.id() == other.0.id()
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap pops its greatest element.
        other
            .0
            .priority()
            .cmp(&self.0.priority())
            .then_with(|| other.0.id().cmp(&self.0.id()))
    }
}

/// Pending jobs, lowest priority value first.
#[derive(Default)]
pub struct PriorityHeap {
    entries: BinaryHeap<HeapEntry>,
}

impl PriorityHeap {
    /// Create an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty heap with room for `capacity` jobs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Insert a job. O(log n).
    pub fn push(&mut self, job: Job) {
        self.entries.push(HeapEntry(job));
    }

    /// Remove the job with the lowest priority value.
    ///
    /// Returns `None` when the heap is empty; never blocks. O(log n).
    pub fn pop_min(&mut self) -> Option<Job> {
        self.entries.pop().map(|entry| entry.0)
    }

    /// Priority of the job [`pop_min`](Self::pop_min) would return next.
    #[must_use]
    pub fn peek_priority(&self) -> Option<Priority> {
        self.entries.peek().map(|entry| entry.0.priority())
    }

    /// Remove every job, returned in dispatch order.
    pub fn drain(&mut self) -> Vec<Job> {
        let mut jobs = Vec::with_capacity(self.entries.len());
        while let Some(job) = self.pop_min() {
            jobs.push(job);
        }
        jobs
    }

    /// Number of pending jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no jobs are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for PriorityHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityHeap")
            .field("len", &self.len())
            .field("next_priority", &self.peek_priority())
            .finish()
    }
}
