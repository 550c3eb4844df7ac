//! Status and health handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::ApiState;
use crate::job::JobStatus;
use crate::poll;

/// How a status query waits for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Evaluate once, return immediately.
    Short,

    /// Hold the request open until terminal or the server-side timeout.
    Long,
}

impl std::str::FromStr for PollMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(PollMode::Short),
            "long" => Ok(PollMode::Long),
            other => Err(ApiError::InvalidArgument(format!(
                "mode must be \"short\" or \"long\", got \"{other}\""
            ))),
        }
    }
}

fn default_mode() -> String {
    "short".to_string()
}

/// Status query parameters.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Id returned by job submission.
    pub job_id: String,

    /// Polling mode, defaults to short.
    #[serde(default = "default_mode")]
    pub mode: String,
}

/// Status response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub result: JobStatus,
}

/// Report a job's status, immediately or via long-poll.
///
/// The job is looked up once, before any waiting: an unknown id fails
/// fast in long mode too (jobs are never deleted mid-poll).
pub async fn get_status(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mode: PollMode = query.mode.parse()?;

    // An id that does not parse as a UUID can never have been issued.
    let job = match Uuid::parse_str(&query.job_id) {
        Ok(id) => state.registry.get(&id).await,
        Err(_) => None,
    }
    .ok_or_else(|| ApiError::NotFound(query.job_id.clone()))?;

    let result = match mode {
        PollMode::Short => job.status(),
        PollMode::Long => poll::await_terminal(&job, &state.poll).await,
    };

    Ok(Json(StatusResponse { result }))
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,

    /// Total registered jobs.
    pub jobs: usize,

    /// Jobs currently observed as pending.
    pub pending: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        jobs: state.registry.len().await,
        pending: state.registry.pending_count().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_mode_parsing() {
        assert_eq!("short".parse::<PollMode>().unwrap(), PollMode::Short);
        assert_eq!("long".parse::<PollMode>().unwrap(), PollMode::Long);
        assert!("LONG".parse::<PollMode>().is_err());
        assert!("".parse::<PollMode>().is_err());
    }
}
