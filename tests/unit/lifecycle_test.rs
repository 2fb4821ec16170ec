//! Tests for lifecycle state as observed through the scheduler handle

use prometheus_job_scheduler::core::{Scheduler, SchedulerState};

#[test]
fn test_state_is_open_follows_lifecycle() {
    let scheduler = Scheduler::new(1).expect("Failed to create scheduler");
    assert!(scheduler.state().is_open());

    scheduler.pause().expect("Failed to pause");
    assert_eq!(scheduler.state(), SchedulerState::Paused);
    assert!(scheduler.state().is_open());

    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert!(!scheduler.state().is_open());
}

#[test]
fn test_scheduler_state_serializes_snake_case() {
    let json = serde_json::to_string(&SchedulerState::Stopping).unwrap();
    assert_eq!(json, r#""stopping""#);
    let parsed: SchedulerState = serde_json::from_str(r#""paused""#).unwrap();
    assert_eq!(parsed, SchedulerState::Paused);
}
