//! Jobsim - simulated asynchronous job execution.
//!
//! Runs the API daemon, and doubles as a small client for it.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobsim::api::{self, ApiState};
use jobsim::registry::JobRegistry;

/// Simulated async job service.
#[derive(Parser)]
#[command(name = "jobsim", about = "Simulated asynchronous job execution")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API daemon.
    Daemon {
        /// Address to bind the API server.
        #[arg(long, default_value = "0.0.0.0:8000", env = "JOBSIM_BIND")]
        bind: String,
    },

    /// Submit a job.
    Submit {
        /// Simulated processing time in seconds.
        #[arg(long)]
        duration: f64,

        /// Make the job end in the error state.
        #[arg(long)]
        should_error: bool,

        /// Jobsim API URL.
        #[arg(long, env = "JOBSIM_API_URL", default_value = "http://localhost:8000")]
        api_url: String,
    },

    /// Query a job's status.
    Status {
        /// Job id returned by submit.
        job_id: String,

        /// Polling mode: short or long.
        #[arg(long, default_value = "short")]
        mode: String,

        /// Jobsim API URL.
        #[arg(long, env = "JOBSIM_API_URL", default_value = "http://localhost:8000")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobsim=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon { bind } => {
            run_daemon(&bind).await?;
        }

        Commands::Submit {
            duration,
            should_error,
            api_url,
        } => {
            submit_job(&api_url, duration, should_error).await?;
        }

        Commands::Status {
            job_id,
            mode,
            api_url,
        } => {
            job_status(&api_url, &job_id, &mode).await?;
        }
    }

    Ok(())
}

/// Run the API daemon.
async fn run_daemon(bind: &str) -> Result<()> {
    tracing::info!("Starting jobsim daemon...");

    // The registry is owned here and injected into the API state; handlers
    // never reach for a global.
    let registry = Arc::new(JobRegistry::new());
    let state = Arc::new(ApiState::new(registry));

    api::serve(state, bind).await?;

    Ok(())
}

/// Submit a job via the API.
async fn submit_job(api_url: &str, duration: f64, should_error: bool) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/jobs", api_url))
        .json(&serde_json::json!({
            "processing_duration": duration,
            "should_error": should_error,
        }))
        .send()
        .await
        .context("Failed to reach jobsim API")?;

    if !response.status().is_success() {
        bail!("Submission failed: {}", read_detail(response).await);
    }

    let body: serde_json::Value = response.json().await?;
    println!(
        "job_id: {}",
        body["job_id"].as_str().unwrap_or("<missing>")
    );
    println!(
        "status: {}",
        body["status"].as_str().unwrap_or("<missing>")
    );

    Ok(())
}

/// Query a job's status via the API.
async fn job_status(api_url: &str, job_id: &str, mode: &str) -> Result<()> {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/status", api_url))
        .query(&[("job_id", job_id), ("mode", mode)])
        .send()
        .await
        .context("Failed to reach jobsim API")?;

    match response.status() {
        reqwest::StatusCode::NOT_FOUND => bail!("No job with id {}", job_id),
        reqwest::StatusCode::TOO_MANY_REQUESTS => {
            bail!("Rate limited by the status endpoint, try again later")
        }
        status if !status.is_success() => {
            bail!("Status query failed: {}", read_detail(response).await)
        }
        _ => {}
    }

    let body: serde_json::Value = response.json().await?;
    println!(
        "status: {}",
        body["result"].as_str().unwrap_or("<missing>")
    );

    Ok(())
}

/// Best-effort extraction of the error detail body.
async fn read_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body["detail"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string()),
        Err(_) => status.to_string(),
    }
}
