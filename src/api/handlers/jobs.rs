//! Job submission handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::ApiState;
use crate::job::{JobOutcome, JobStatus};

/// Submission request body.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// Simulated processing time in seconds.
    pub processing_duration: f64,

    /// Whether the job should end in the error state.
    pub should_error: bool,
}

/// Submission response: the new id plus its immediately observed status
/// (pending for any duration > 0, terminal for 0).
#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

/// Create a new simulated job.
pub async fn create_job(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, ApiError> {
    // try_from_secs_f64 rejects negative, NaN, infinite, and overflowing
    // values in one place; nothing is registered on rejection.
    let duration = Duration::try_from_secs_f64(request.processing_duration).map_err(|_| {
        ApiError::InvalidArgument(format!(
            "processing_duration must be a finite non-negative number of seconds, got {}",
            request.processing_duration
        ))
    })?;

    let outcome = JobOutcome::from_should_error(request.should_error);
    let job = state.registry.create(duration, outcome).await;

    Ok(Json(CreateJobResponse {
        job_id: job.id,
        status: job.status(),
    }))
}
