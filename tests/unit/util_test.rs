//! Tests for utility functions

use prometheus_job_scheduler::util::{now_ms, JobId, Priority};

#[test]
fn test_clock_is_monotonic_enough() {
    let a = now_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let b = now_ms();
    assert!(b >= a);
    assert!(a > 0);
}

#[test]
fn test_job_id_and_priority_aliases() {
    let id: JobId = 12345;
    let priority: Priority = -7;
    assert_eq!(id, 12345);
    assert!(priority < 0);
}
