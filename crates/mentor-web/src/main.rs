//! Mentor HTTP API server.
//!
//! Serves `POST /respond` plus health, mentor listing, and diagnostics
//! endpoints. The API key comes from `GEMINI_API_KEY` (a `.env` file in the
//! working directory is honored); the server refuses to start without it.
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p mentor-web
//! GEMINI_API_KEY=... cargo run -p mentor-web -- --port 8080 --model gemini-2.0-flash
//! RUST_LOG=mentor_web=trace cargo run -p mentor-web
//! ```
//!
//! Then:
//!
//! ```bash
//! curl -X POST localhost:5000/respond \
//!   -H 'content-type: application/json' \
//!   -d '{"question": "How do I stay disciplined?", "mentor_option": 2}'
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mentor_rs::prelude::*;
use mentor_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// HTTP API for mentor persona replies.
#[derive(Parser)]
#[command(name = "mentor-web", about = "Serve mentor persona replies over HTTP")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Model to use (overrides GEMINI_MODEL).
    #[arg(long)]
    model: Option<String>,

    /// Content-filter threshold: none, only-high, medium, low.
    #[arg(long, env = "MENTOR_SAFETY_THRESHOLD", default_value = "only-high")]
    safety_threshold: HarmBlockThreshold,

    /// Seconds a `/respond` call may take before it fails with 508.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Seconds the `/test-pipeline` run may take.
    #[arg(long, default_value_t = 10)]
    diagnostics_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mentor_rs=debug,mentor_web=debug")),
        )
        .init();

    let args = Args::parse();

    // 1. Configuration. A missing key stops us before we bind.
    let mut config = MentorConfig::from_env()?.with_safety_threshold(args.safety_threshold);
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    // 2. Model client and pipeline, shared by every request.
    let client = GeminiClient::new(&config)?;
    info!("Using model {}", client.model());
    let pipeline = Arc::new(ResponsePipeline::with_model(client));

    // 3. Serve.
    let web_config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        diagnostics_timeout: Duration::from_secs(args.diagnostics_timeout_secs),
    };
    let addr = spawn_web(pipeline, web_config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("Mentor API: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("Shutting down");
    Ok(())
}
