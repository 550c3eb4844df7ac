//! API error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP boundary.
///
/// The core never fails while evaluating status, so the whole failure
/// surface is bad input, an unknown job id, and the rate cap — all caught
/// before any state-machine logic runs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed submission or query parameter. No job is ever registered
    /// from a rejected request.
    #[error("{0}")]
    InvalidArgument(String),

    /// Status query for a job id that was never registered.
    #[error("Task with job_id {0} not found")]
    NotFound(String),

    /// Client exceeded the per-IP request cap on the status endpoint.
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
