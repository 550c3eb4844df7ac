//! The simulated job and its time-derived state machine.
//!
//! A [`Job`] never does any work. It records when it was created, how long
//! it is supposed to "take", and how it is supposed to end. Its status is
//! derived from the clock on every read: `Pending` while the declared
//! duration has not elapsed, then exactly one transition to a terminal
//! state (`Completed` or `Error`) that is cached and never revisited.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Observable status of a job.
///
/// Serializes to the wire literals `"pending"`, `"completed"`, `"error"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The declared duration has not yet elapsed.
    Pending,

    /// Finished successfully.
    Completed,

    /// Finished in the declared failure state.
    Error,
}

impl JobStatus {
    /// Completed and Error are permanent; Pending is not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// How the job is declared to end once its duration elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Ends as `Completed`.
    Success,

    /// Ends as `Error`.
    Failure,
}

impl JobOutcome {
    /// Map the submission-level `should_error` flag to an outcome.
    pub fn from_should_error(should_error: bool) -> Self {
        if should_error {
            JobOutcome::Failure
        } else {
            JobOutcome::Success
        }
    }

    fn terminal_status(self) -> JobStatus {
        match self {
            JobOutcome::Success => JobStatus::Completed,
            JobOutcome::Failure => JobStatus::Error,
        }
    }
}

/// One simulated unit of asynchronous work.
///
/// All fields describing the job are immutable after construction; the only
/// mutable piece is the terminal-status cache, which is written at most
/// once. Concurrent readers racing on that write all compute the identical
/// value from the immutable fields, so the cache needs no lock.
#[derive(Debug)]
pub struct Job {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,

    /// Monotonic creation timestamp.
    pub created_at: Instant,

    /// Simulated processing duration.
    pub duration: Duration,

    /// Declared outcome once the duration elapses.
    pub outcome: JobOutcome,

    /// Terminal status, set on the first observation at or past `duration`.
    terminal: OnceLock<JobStatus>,
}

impl Job {
    /// Create a job starting now with a fresh v4 id.
    pub fn new(duration: Duration, outcome: JobOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Instant::now(),
            duration,
            outcome,
            terminal: OnceLock::new(),
        }
    }

    /// Evaluate the job's status as of `now`.
    ///
    /// Once terminal this is a pure cache read with no time dependence.
    /// A `now` earlier than `created_at` is clamped to zero elapsed time,
    /// so a zero-duration job is terminal on its very first observation.
    /// Never fails and never regresses: the only transition is
    /// Pending -> {Completed, Error}, exactly once.
    pub fn status_at(&self, now: Instant) -> JobStatus {
        if let Some(status) = self.terminal.get() {
            return *status;
        }

        let elapsed = now.saturating_duration_since(self.created_at);
        if elapsed < self.duration {
            return JobStatus::Pending;
        }

        // Racing writers all derive the same value, so losing the race
        // to set the cell is harmless.
        *self.terminal.get_or_init(|| self.outcome.terminal_status())
    }

    /// Evaluate the job's status against the current clock.
    pub fn status(&self) -> JobStatus {
        self.status_at(Instant::now())
    }
}
