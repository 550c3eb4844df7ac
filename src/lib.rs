//! Jobsim - a simulated asynchronous job execution service.
//!
//! Clients submit a job with a declared processing duration and a declared
//! outcome; the service tracks the job's lifecycle purely by elapsed
//! wall-clock time and reports it through an immediate-read endpoint and a
//! long-polling endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      REST API (axum)                    │
//! │  POST /jobs        submit a simulated job               │
//! │  GET  /status      short or long-poll status            │
//! │  GET  /health      registry counters                    │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │ Arc<ApiState>
//! ┌───────────────────────────┴─────────────────────────────┐
//! │  JobRegistry   lock-guarded map: Uuid -> Arc<Job>       │
//! │  Job           time-derived state machine               │
//! │                pending -> {completed, error}, once      │
//! │  poll          cooperative long-poll loop (5 s / 500 ms)│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! No real work is performed: "processing" is the passage of time, and a
//! job's terminal state is computed from its immutable creation record.

/// Job state machine.
pub mod job;

/// Shared job registry.
pub mod registry;

/// Long-poll status resolver.
pub mod poll;

/// REST API.
pub mod api;
