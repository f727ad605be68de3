//! REST endpoint handlers.
//!
//! `POST /respond` is the only endpoint that talks to the model on behalf of
//! a caller. Its input is validated here, before the pipeline runs; past
//! that point the pipeline itself guarantees a reply, so the remaining
//! failures are a deadline overrun (508) or a crashed task (500).

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use mentor_rs::persona::{Persona, all_personas, get_persona};
use mentor_rs::pipeline::{Reply, ResponsePipeline};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::ApiError;

/// Question the diagnostics endpoint sends through the pipeline.
pub const DIAGNOSTIC_QUESTION: &str = "test question";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResponsePipeline>,
    pub request_timeout: Duration,
    pub diagnostics_timeout: Duration,
}

/// A validated `/respond` body.
#[derive(Debug, PartialEq, Eq)]
pub struct RespondRequest {
    pub question: String,
    pub mentor_option: i64,
}

impl RespondRequest {
    /// Validate a raw JSON body.
    ///
    /// `mentor_option` may be an integer, an integral float, or a numeric
    /// string; the question must be a string that is non-empty after trimming.
    pub fn from_json(body: &Value) -> Result<Self, ApiError> {
        let data = match body.as_object() {
            Some(map) if !map.is_empty() => map,
            _ => return Err(ApiError::bad_request("No JSON data provided")),
        };

        let question = data
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if question.is_empty() {
            return Err(ApiError::bad_request(
                "Missing or empty 'question' in request body",
            ));
        }

        let raw_option = match data.get("mentor_option") {
            None | Some(Value::Null) => {
                return Err(ApiError::bad_request(
                    "Missing 'mentor_option' in request body",
                ));
            }
            Some(v) => v,
        };
        let mentor_option = coerce_option(raw_option)
            .ok_or_else(|| ApiError::bad_request("mentor_option must be a valid integer"))?;
        if !(0..=2).contains(&mentor_option) {
            return Err(ApiError::bad_request(
                "Invalid mentor_option. Must be 0, 1, or 2",
            ));
        }

        Ok(Self {
            question: question.to_string(),
            mentor_option,
        })
    }
}

fn coerce_option(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Serialize)]
pub struct RespondResponse {
    pub response: String,
}

/// POST /respond — Get a mentor's reply.
///
/// Returns 200 `{response}`; 400 for invalid input; 508 when the pipeline
/// exceeds the request timeout; 500 if the pipeline task dies.
pub async fn post_respond(
    State(app): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RespondResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        debug!("Rejected body: {e}");
        ApiError::bad_request("No JSON data provided")
    })?;
    let request = RespondRequest::from_json(&body)?;
    let persona = get_persona(request.mentor_option)?;
    info!(
        "Respond request: mentor={} ({}), {} chars",
        request.mentor_option,
        persona.name,
        request.question.len()
    );

    let reply = run_pipeline(&app.pipeline, persona, request.question, app.request_timeout)
        .await
        .map_err(|failure| match failure {
            PipelineFailure::TimedOut => ApiError::timeout(
                "Request timed out. The mentor is taking too long to respond.",
            ),
            PipelineFailure::Crashed(msg) => {
                ApiError::internal(format!("Internal server error: {msg}"))
            }
        })?;

    if reply.text.trim().is_empty() {
        return Err(ApiError::internal("Empty response from mentor"));
    }
    Ok(Json(RespondResponse {
        response: reply.text,
    }))
}

enum PipelineFailure {
    TimedOut,
    Crashed(String),
}

/// Run the pipeline on its own task under a deadline. A timed-out task is
/// aborted; the provider is not told.
async fn run_pipeline(
    pipeline: &Arc<ResponsePipeline>,
    persona: &'static Persona,
    question: String,
    deadline: Duration,
) -> Result<Reply, PipelineFailure> {
    let pipeline = Arc::clone(pipeline);
    let handle = tokio::spawn(async move { pipeline.respond_detailed(persona, &question).await });
    let abort = handle.abort_handle();

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(join_err)) => Err(PipelineFailure::Crashed(join_err.to_string())),
        Err(_) => {
            abort.abort();
            Err(PipelineFailure::TimedOut)
        }
    }
}

/// GET /health — Liveness probe.
pub async fn get_health(State(app): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Mentor API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "model": app.pipeline.model_name(),
    }))
}

#[derive(Serialize)]
pub struct MentorSummary {
    pub option: usize,
    pub name: &'static str,
    pub age: u32,
}

/// GET /mentors — The selectable mentors by option code.
pub async fn get_mentors() -> Json<Vec<MentorSummary>> {
    Json(
        all_personas()
            .iter()
            .enumerate()
            .map(|(option, p)| MentorSummary {
                option,
                name: p.name.as_str(),
                age: p.age,
            })
            .collect(),
    )
}

/// GET /test-pipeline — Run a canned question through the pipeline and
/// report what happened. For operators, not for clients.
pub async fn get_test_pipeline(State(app): State<AppState>) -> Result<Json<Value>, ApiError> {
    let persona = get_persona(0)?;
    let start = Instant::now();
    let result = run_pipeline(
        &app.pipeline,
        persona,
        DIAGNOSTIC_QUESTION.to_string(),
        app.diagnostics_timeout,
    )
    .await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let body = match result {
        Ok(reply) => json!({
            "ok": reply.error.is_none(),
            "mentor": persona.name,
            "model": app.pipeline.model_name(),
            "conversation_type": reply.conversation_type,
            "source": reply.source,
            "response": reply.text,
            "error": reply.error,
            "elapsed_ms": elapsed_ms,
        }),
        Err(failure) => json!({
            "ok": false,
            "mentor": persona.name,
            "model": app.pipeline.model_name(),
            "error": match failure {
                PipelineFailure::TimedOut => format!(
                    "timed out after {}ms",
                    app.diagnostics_timeout.as_millis()
                ),
                PipelineFailure::Crashed(msg) => msg,
            },
            "elapsed_ms": elapsed_ms,
        }),
    };
    Ok(Json(body))
}
