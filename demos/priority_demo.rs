//! Priority scheduling walkthrough.
//!
//! Adds a mixed batch of jobs, lets a few run, pauses dispatch, resumes, and
//! stops. Run with `RUST_LOG=debug` to see the dispatcher and worker events.
//!
//! ```text
//! cargo run --example priority_demo
//! ```

use std::thread;
use std::time::{Duration, Instant};

use prometheus_job_scheduler::core::AppResult;
use prometheus_job_scheduler::util::init_tracing_with_default;
use prometheus_job_scheduler::{Scheduler, SchedulerConfig, ShutdownPolicy};

const JOB_DURATION: Duration = Duration::from_millis(500);

fn main() -> AppResult<()> {
    init_tracing_with_default("info");

    let config = SchedulerConfig::new()
        .with_worker_count(3)
        .with_shutdown_policy(ShutdownPolicy::DropPending)
        .with_thread_name_prefix("demo");
    let scheduler = Scheduler::with_config(config)?;
    let started = Instant::now();

    // Hold dispatch so the whole batch competes on priority.
    scheduler.pause()?;
    let batch = [
        ("rebuild search index", 8),
        ("send password reset", 1),
        ("resize avatar", 5),
        ("charge card", 0),
        ("nightly report", 9),
        ("refresh cache", 5),
        ("notify followers", 3),
    ];
    for (name, priority) in batch {
        let id = scheduler.add_job(
            move || {
                println!("[{:>5}ms] running {name} (priority {priority})", started.elapsed().as_millis());
                thread::sleep(JOB_DURATION);
            },
            priority,
        )?;
        println!("added job {id}: {name} (priority {priority})");
    }
    scheduler.resume()?;

    thread::sleep(JOB_DURATION / 2);
    println!("\n--- pausing ---");
    scheduler.pause()?;
    println!("{}", serde_json::to_string_pretty(&scheduler.stats())?);
    thread::sleep(JOB_DURATION * 2);

    println!("\n--- resuming ---");
    scheduler.resume()?;
    thread::sleep(JOB_DURATION * 3);

    println!("\n--- stopping ---");
    let report = scheduler.stop();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
