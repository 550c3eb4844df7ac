//! API request handlers.

pub mod jobs;
pub mod status;
