//! REST API for the jobsim daemon.
//!
//! Provides HTTP endpoints for:
//! - Job submission
//! - Job status (immediate and long-poll)
//! - Health

pub mod error;
pub mod handlers;

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::poll::PollConfig;
use crate::registry::JobRegistry;
use error::ApiError;

/// Request cap on the status endpoint, per client IP.
const STATUS_REQUESTS_PER_MINUTE: u32 = 25;

/// Shared state for API handlers.
pub struct ApiState {
    /// The job registry, owned here and shared by all handlers.
    pub registry: Arc<JobRegistry>,

    /// Long-poll protocol constants.
    pub poll: PollConfig,

    /// Per-IP limiter guarding the status route.
    status_limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl ApiState {
    /// Create API state with the default long-poll configuration.
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(STATUS_REQUESTS_PER_MINUTE).expect("cap is nonzero"),
        );
        Self {
            registry,
            poll: PollConfig::default(),
            status_limiter: RateLimiter::keyed(quota),
        }
    }

    /// Override the long-poll configuration (tests use short timeouts).
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

/// Per-IP rate limit middleware for the status route.
///
/// The job core is unaware of this policy; over-limit requests are
/// rejected before any handler logic runs.
async fn rate_limit_status(
    State(state): State<Arc<ApiState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.status_limiter.check_key(&addr.ip()).is_err() {
        tracing::warn!(client = %addr.ip(), "status request rate limited");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}

/// Build the API router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let status_routes = Router::new()
        .route("/status", get(handlers::status::get_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_status,
        ));

    Router::new()
        .route("/jobs", post(handlers::jobs::create_job))
        .route("/health", get(handlers::status::health))
        .merge(status_routes)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the API server.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "API server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
