//! HTTP API for mentor-rs persona replies.
//!
//! `mentor-web` wraps a [`ResponsePipeline`] in an axum server. Clients post
//! a question and a mentor option and get back one in-character reply.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use mentor_rs::prelude::*;
//! use mentor_web::{WebConfig, spawn_web};
//!
//! let config = MentorConfig::from_env()?;
//! let pipeline = Arc::new(ResponsePipeline::with_model(GeminiClient::new(&config)?));
//!
//! let addr = spawn_web(pipeline, WebConfig::default()).await?;
//! println!("Mentor API: http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Success | Errors |
//! |--------|------|---------|--------|
//! | `POST` | `/respond` | `{"response": "..."}` | 400 bad input, 508 timeout, 500 internal |
//! | `GET` | `/health` | `{"status": "healthy", ...}` | |
//! | `GET` | `/mentors` | `[{"option", "name", "age"}]` | |
//! | `GET` | `/test-pipeline` | `{"ok", "response", "elapsed_ms", ...}` | |
//!
//! Errors always have the body `{"error": "<message>"}`.

pub mod api;
pub mod error;
mod server;

pub use api::AppState;
pub use error::ApiError;
pub use server::build_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mentor_rs::pipeline::ResponsePipeline;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind to. Default: `0.0.0.0:5000`.
    pub bind_addr: SocketAddr,
    /// Deadline for one `/respond` call, model round trip included.
    /// Default: 30 seconds.
    pub request_timeout: Duration,
    /// Deadline for the `/test-pipeline` diagnostics run. Default: 10 seconds.
    pub diagnostics_timeout: Duration,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            request_timeout: Duration::from_secs(30),
            diagnostics_timeout: Duration::from_secs(10),
        }
    }
}

/// Spawn the web server on a Tokio task.
///
/// Returns the bound address; pass port 0 in `config.bind_addr` to let the
/// OS choose. The server runs until the Tokio runtime shuts down.
pub async fn spawn_web(
    pipeline: Arc<ResponsePipeline>,
    config: WebConfig,
) -> std::io::Result<SocketAddr> {
    let state = AppState {
        pipeline,
        request_timeout: config.request_timeout,
        diagnostics_timeout: config.diagnostics_timeout,
    };
    let router = server::build_router(state);
    server::start_server(router, config.bind_addr).await
}
