//! Integration tests for the mentor-web server.
//!
//! These tests start a real axum server on a random port with a scripted
//! model in place of Gemini and exercise the HTTP contract end to end.

use std::sync::Arc;
use std::time::Duration;

use mentor_rs::prelude::*;
use mentor_web::{WebConfig, spawn_web};
use serde_json::{Value, json};

/// Answers like a mentor would, keyed on what the prompt asks for.
struct StageModel;

impl GenerativeModel for StageModel {
    fn generate<'a>(&'a self, prompt: &'a str) -> ModelFuture<'a> {
        let text = if prompt.contains("introduce yourself") {
            "Greetings. I am Miyamoto Musashi, a wanderer of the Way of the sword. How can I help you today?"
        } else if prompt.contains("saying goodbye") {
            "Go well, dear one. Love walks beside you."
        } else {
            "Train every day, and fear loses its hold."
        };
        Box::pin(async move { Ok(Completion::stop(text)) })
    }

    fn model_name(&self) -> &str {
        "stage"
    }
}

/// Every call fails at the transport layer.
struct DownModel;

impl GenerativeModel for DownModel {
    fn generate<'a>(&'a self, _prompt: &'a str) -> ModelFuture<'a> {
        Box::pin(async { Err(ProviderError::Transport("connection refused".into())) })
    }
}

/// Sleeps far past any test deadline.
struct SlowModel;

impl GenerativeModel for SlowModel {
    fn generate<'a>(&'a self, _prompt: &'a str) -> ModelFuture<'a> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Completion::stop("too late"))
        })
    }
}

/// Helper: spawn a test server on port 0 (random available port).
async fn spawn_test_server(model: impl GenerativeModel + 'static, config: WebConfig) -> String {
    let pipeline = Arc::new(ResponsePipeline::with_model(model));
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..config
    };
    let addr = spawn_web(pipeline, config).await.unwrap();
    format!("http://{addr}")
}

async fn post_respond(base: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/respond"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ── /respond ─────────────────────────────────────────────────────────

#[tokio::test]
async fn greeting_introduces_musashi() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let (status, json) = post_respond(&base, json!({"question": "hi", "mentor_option": 0})).await;
    assert_eq!(status, 200);
    let response = json["response"].as_str().unwrap();
    assert!(response.contains("Musashi"));
}

#[tokio::test]
async fn farewell_gets_a_short_goodbye() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let (status, json) = post_respond(&base, json!({"question": "bye", "mentor_option": 1})).await;
    assert_eq!(status, 200);
    assert_eq!(json["response"], "Go well, dear one. Love walks beside you.");
}

#[tokio::test]
async fn provider_outage_still_answers_in_character() {
    let base = spawn_test_server(DownModel, WebConfig::default()).await;

    let (status, json) = post_respond(&base, json!({"question": "hi", "mentor_option": 0})).await;
    assert_eq!(status, 200);
    assert_eq!(
        json["response"],
        "Greetings, seeker. I am Miyamoto Musashi. How may I guide you today?"
    );

    let (status, json) = post_respond(&base, json!({"question": "bye", "mentor_option": 1})).await;
    assert_eq!(status, 200);
    assert!(!json["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn missing_question_is_400() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let (status, json) = post_respond(&base, json!({"mentor_option": 0})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "Missing or empty 'question' in request body");
}

#[tokio::test]
async fn out_of_range_option_is_400() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let (status, json) = post_respond(&base, json!({"question": "hi", "mentor_option": 5})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "Invalid mentor_option. Must be 0, 1, or 2");

    let (status, json) =
        post_respond(&base, json!({"question": "hi", "mentor_option": "Musashi"})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "mentor_option must be a valid integer");
}

#[tokio::test]
async fn string_option_is_coerced() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let (status, _) = post_respond(&base, json!({"question": "What is fear?", "mentor_option": "2"})).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn non_json_body_is_400() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/respond"))
        .header("content-type", "application/json")
        .body("question=hi")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "No JSON data provided");
}

#[tokio::test]
async fn slow_model_times_out_with_508() {
    let config = WebConfig {
        request_timeout: Duration::from_millis(200),
        ..Default::default()
    };
    let base = spawn_test_server(SlowModel, config).await;

    let (status, json) = post_respond(&base, json!({"question": "What is fear?", "mentor_option": 2})).await;
    assert_eq!(status, 508);
    assert!(json["error"].as_str().unwrap().contains("timed out"));
}

// ── Other endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_healthy() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["message"], "Mentor API is running");
    assert_eq!(json["model"], "stage");
}

#[tokio::test]
async fn mentors_lists_three_options() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;

    let json: Value = reqwest::get(format!("{base}/mentors"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mentors = json.as_array().unwrap();
    assert_eq!(mentors.len(), 3);
    assert_eq!(mentors[0]["option"], 0);
    assert_eq!(mentors[0]["name"], "Miyamoto Musashi");
    assert_eq!(mentors[1]["name"], "Jalal ad-Din Rumi");
}

#[tokio::test]
async fn test_pipeline_reports_success_and_failure() {
    let base = spawn_test_server(StageModel, WebConfig::default()).await;
    let json: Value = reqwest::get(format!("{base}/test-pipeline"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["conversation_type"], "question");
    assert_eq!(json["source"], "model");
    assert!(json["elapsed_ms"].is_u64());

    let base = spawn_test_server(DownModel, WebConfig::default()).await;
    let json: Value = reqwest::get(format!("{base}/test-pipeline"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["source"], "safety_net");
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}
