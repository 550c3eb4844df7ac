//! Shared job registry.
//!
//! The registry is the single shared mutable structure in the service: a
//! lock-guarded map from job id to [`Job`]. It is constructed once by the
//! process entry point and injected into the API state; handlers receive
//! cloned `Arc<Job>` handles, never mutable access to an entry. Entries
//! are never removed — jobs live for the process lifetime, a deliberate
//! simplification of this simulator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::job::{Job, JobOutcome, JobStatus};

/// Authoritative store mapping job identifiers to jobs.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<Uuid, Arc<Job>>>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new job, returning a handle to it.
    ///
    /// Each call registers a distinct job even with identical parameters;
    /// there is no idempotency key.
    pub async fn create(&self, duration: Duration, outcome: JobOutcome) -> Arc<Job> {
        let job = Arc::new(Job::new(duration, outcome));
        self.jobs.write().await.insert(job.id, job.clone());

        tracing::info!(
            job_id = %job.id,
            duration_secs = job.duration.as_secs_f64(),
            outcome = ?job.outcome,
            "job registered"
        );

        job
    }

    /// Look up a job by id. `None` means the id was never registered —
    /// never a stand-in empty job.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Job>> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Number of registered jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the registry holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Count of jobs currently observed as [`JobStatus::Pending`].
    pub async fn pending_count(&self) -> usize {
        self.jobs
            .read()
            .await
            .values()
            .filter(|job| job.status() == JobStatus::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let registry = JobRegistry::new();

        let job = registry
            .create(Duration::from_secs(3), JobOutcome::Success)
            .await;

        let fetched = registry.get(&job.id).await.expect("job should exist");
        assert_eq!(fetched.id, job.id);
        assert_eq!(fetched.status(), JobStatus::Pending);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let registry = JobRegistry::new();
        assert!(registry.get(&Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_identical_parameters_yield_distinct_jobs() {
        let registry = JobRegistry::new();

        let a = registry.create(Duration::ZERO, JobOutcome::Failure).await;
        let b = registry.create(Duration::ZERO, JobOutcome::Failure).await;

        assert_ne!(a.id, b.id);
        assert_eq!(registry.len().await, 2);

        // Independent lifecycles: both are terminal on their own.
        assert_eq!(a.status(), JobStatus::Error);
        assert_eq!(b.status(), JobStatus::Error);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_retained() {
        let registry = Arc::new(JobRegistry::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .create(Duration::from_secs(60), JobOutcome::Success)
                    .await
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        assert_eq!(registry.len().await, 32);
        for id in ids {
            assert!(registry.get(&id).await.is_some());
        }
    }

    #[tokio::test]
    async fn test_pending_count_tracks_terminal_transitions() {
        let registry = JobRegistry::new();

        registry.create(Duration::ZERO, JobOutcome::Success).await;
        registry
            .create(Duration::from_secs(60), JobOutcome::Success)
            .await;

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.pending_count().await, 1);
    }
}
