//! Tests for error types

use prometheus_job_scheduler::core::{AppResult, SchedulerError, TaskFault};

#[test]
fn test_invalid_configuration_error() {
    let err = SchedulerError::InvalidConfiguration("worker_count must be at least 1".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: worker_count must be at least 1"
    );
}

#[test]
fn test_scheduler_closed_error() {
    let err = SchedulerError::SchedulerClosed;
    assert_eq!(format!("{}", err), "scheduler closed");
}

#[test]
fn test_spawn_error() {
    let err = SchedulerError::Spawn("worker 3: out of memory".to_string());
    assert_eq!(format!("{}", err), "failed to spawn thread: worker 3: out of memory");
}

#[test]
fn test_task_fault_error() {
    let fault = TaskFault {
        job_id: 7,
        priority: -2,
        worker_id: 1,
        message: "boom".to_string(),
    };
    let err: SchedulerError = fault.clone().into();
    assert_eq!(
        format!("{}", err),
        "task fault: job 7 (priority -2) panicked on worker 1: boom"
    );
    assert!(matches!(err, SchedulerError::TaskFault(f) if f == fault));
}

#[test]
fn test_app_result_carries_context() {
    fn closed() -> AppResult<()> {
        Err(SchedulerError::SchedulerClosed.into())
    }
    let err = closed().unwrap_err();
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
