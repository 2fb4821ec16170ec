//! Tests for configuration validation

use prometheus_job_scheduler::config::{
    SchedulerConfig, ShutdownPolicy, DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_NAME_PREFIX,
    MIN_THREAD_STACK_SIZE,
};
use prometheus_job_scheduler::core::SchedulerError;

#[test]
fn test_scheduler_config_validation() {
    let valid = SchedulerConfig::new()
        .with_worker_count(4)
        .with_queue_capacity(32)
        .with_shutdown_policy(ShutdownPolicy::DrainPending);
    assert!(valid.validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_queue_capacity() {
    let invalid = SchedulerConfig::new().with_queue_capacity(0);
    assert!(matches!(
        invalid.validate(),
        Err(SchedulerError::InvalidConfiguration(msg)) if msg.contains("queue_capacity")
    ));
}

#[test]
fn test_scheduler_config_invalid_prefix() {
    let invalid = SchedulerConfig::new().with_thread_name_prefix("   ");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_minimum_stack_accepted() {
    let cfg = SchedulerConfig::new().with_thread_stack_size(MIN_THREAD_STACK_SIZE);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json_partial() {
    let cfg = SchedulerConfig::from_json_str(r#"{"worker_count": 2, "shutdown_policy": "drain_pending"}"#)
        .expect("Failed to parse config");
    assert_eq!(cfg.worker_count, 2);
    assert_eq!(cfg.shutdown_policy, ShutdownPolicy::DrainPending);
    assert_eq!(cfg.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    assert_eq!(cfg.thread_name_prefix, DEFAULT_THREAD_NAME_PREFIX);
}

#[test]
fn test_scheduler_config_from_json_invalid() {
    assert!(SchedulerConfig::from_json_str("{ not json").is_err());
    assert!(SchedulerConfig::from_json_str(r#"{"worker_count": 0}"#).is_err());
}

#[test]
fn test_scheduler_config_json_round_trip() {
    let cfg = SchedulerConfig::new()
        .with_worker_count(3)
        .with_thread_name_prefix("ingest");
    let json = serde_json::to_string(&cfg).expect("Failed to serialize config");
    assert!(json.contains(r#""shutdown_policy":"drop_pending""#));
    assert_eq!(SchedulerConfig::from_json_str(&json).unwrap(), cfg);
}
