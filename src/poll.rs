//! Long-poll status resolver.
//!
//! A long-poll request holds open until the job reaches a terminal state
//! or a fixed server-side timeout elapses, re-evaluating on a fixed
//! interval. The suspension between evaluations is a cooperative
//! `tokio::time::sleep`, so a parked long-poll never blocks the runtime
//! worker from serving other requests, and no lock is held across the
//! await.

use std::time::{Duration, Instant};

use crate::job::{Job, JobStatus};

/// Protocol constants for the long-poll loop.
///
/// The HTTP layer always uses [`Default`] (5 s timeout, 500 ms interval);
/// tests construct shorter configurations.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Ceiling on how long a single long-poll request is held open.
    pub timeout: Duration,

    /// Pause between status evaluations.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(500),
        }
    }
}

/// Wait until `job` is terminal or the configured timeout expires.
///
/// Returns the terminal status as soon as one is observed; returns
/// `Pending` once the timeout elapses, which is a defined successful
/// outcome ("still pending after waiting"), not an error. The status is
/// evaluated at the top of every iteration, before the elapsed time is
/// compared against the bound, so a job turning terminal exactly at the
/// timeout boundary is still reported terminal.
pub async fn await_terminal(job: &Job, config: &PollConfig) -> JobStatus {
    let wait_start = Instant::now();

    loop {
        let status = job.status();
        if status.is_terminal() {
            return status;
        }

        if wait_start.elapsed() >= config.timeout {
            tracing::debug!(job_id = %job.id, "long-poll expired while pending");
            return JobStatus::Pending;
        }

        tokio::time::sleep(config.interval).await;
    }
}
