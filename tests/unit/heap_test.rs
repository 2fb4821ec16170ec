//! Tests for the priority heap

use prometheus_job_scheduler::core::{Job, PriorityHeap};

fn job(id: u64, priority: i64) -> Job {
    Job::new(id, priority, || {})
}

#[test]
fn test_min_priority_first() {
    let mut heap = PriorityHeap::new();
    for (id, priority) in [(1, 5), (2, 1), (3, 3)] {
        heap.push(job(id, priority));
    }
    assert_eq!(heap.peek_priority(), Some(1));

    let order: Vec<_> = std::iter::from_fn(|| heap.pop_min())
        .map(|j| j.priority())
        .collect();
    assert_eq!(order, vec![1, 3, 5]);
    assert!(heap.is_empty());
}

#[test]
fn test_ties_break_by_job_id() {
    let mut heap = PriorityHeap::with_capacity(4);
    for id in [4, 2, 3, 1] {
        heap.push(job(id, 0));
    }
    let ids: Vec<_> = heap.drain().iter().map(Job::id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(heap.len(), 0);
}

#[test]
fn test_extreme_priorities() {
    let mut heap = PriorityHeap::new();
    heap.push(job(1, i64::MAX));
    heap.push(job(2, 0));
    heap.push(job(3, i64::MIN));
    assert_eq!(heap.pop_min().map(|j| j.priority()), Some(i64::MIN));
    assert_eq!(heap.pop_min().map(|j| j.priority()), Some(0));
    assert_eq!(heap.pop_min().map(|j| j.priority()), Some(i64::MAX));
    assert!(heap.pop_min().is_none());
}
