//! Persona-driven mentor responses on top of the Gemini API.
//!
//! `mentor-rs` turns a student's message and a selected mentor persona into a
//! single in-character reply. The core abstraction is the
//! [`ResponsePipeline`](pipeline::ResponsePipeline): it classifies the message
//! (greeting, farewell or question), renders a persona-specific prompt, sends
//! it to the generative model, and sanitizes the result. Every code path ends
//! in a non-empty string; provider failures turn into in-character fallbacks.
//!
//! # Getting started
//!
//! ```ignore
//! use mentor_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MentorError> {
//!     let config = MentorConfig::from_env()?;
//!     let client = GeminiClient::new(&config)?;
//!     let pipeline = ResponsePipeline::new(ModelGateway::new(client));
//!
//!     let persona = get_persona(0)?;
//!     let reply = pipeline.respond(persona, "How do I stop fearing failure?").await;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`persona`] | The three built-in mentors and the option-code registry |
//! | [`classify`] | Keyword-based greeting / farewell / question detection |
//! | [`compose`] | Prompt templates per conversation type |
//! | [`gateway`] | [`GenerativeModel`](gateway::GenerativeModel) seam and the finish-reason decision table |
//! | [`sanitize`] | Typographic character replacement for plain consoles |
//! | [`pipeline`] | Orchestration and the outer fallback net |
//! | [`config`] | [`MentorConfig`](config::MentorConfig) and environment loading |
//! | [`error`] | [`MentorError`](error::MentorError) and [`ProviderError`](error::ProviderError) |

pub mod classify;
pub mod compose;
pub mod config;
pub mod error;
pub mod gateway;
pub mod persona;
pub mod pipeline;
pub mod prelude;
pub mod sanitize;

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{GenerationSettings, HarmBlockThreshold, MentorConfig};
use crate::error::{MentorError, ProviderError};

// ── Constants ──────────────────────────────────────────────────────

/// Base URL of the Generative Language API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for mentor responses.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ── Request types ──────────────────────────────────────────────────

/// `generateContent` request body.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateRequest {
    /// Build a single-turn request for `prompt` using the configured sampling
    /// and safety settings.
    pub fn single_turn(
        prompt: impl Into<String>,
        settings: &GenerationSettings,
        threshold: HarmBlockThreshold,
    ) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig::from(settings),
            safety_settings: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold,
                })
                .collect(),
        }
    }
}

/// One turn of conversation content.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters, in the provider's field naming.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<&GenerationSettings> for GenerationConfig {
    fn from(s: &GenerationSettings) -> Self {
        Self {
            temperature: s.temperature,
            top_p: s.top_p,
            top_k: s.top_k,
            max_output_tokens: s.max_output_tokens,
        }
    }
}

/// Content-filter category.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    /// The categories a mentor request configures.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawGenerateResponse {
    #[serde(default)]
    candidates: Vec<RawCandidate>,
    prompt_feedback: Option<RawPromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<ApiErrorResponse>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    content: Option<Content>,
    finish_reason: Option<FinishReason>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Why the provider stopped generating.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String")]
pub enum FinishReason {
    /// Natural stop point.
    Stop,
    /// Output hit `maxOutputTokens`.
    MaxTokens,
    /// A safety filter (or a safety-family filter such as a blocklist) fired.
    Safety,
    /// The recitation filter fired.
    Recitation,
    /// Anything else, including unspecified codes. Holds the raw code.
    Other(String),
}

impl From<&str> for FinishReason {
    fn from(code: &str) -> Self {
        match code {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

impl From<String> for FinishReason {
    fn from(code: String) -> Self {
        FinishReason::from(code.as_str())
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "STOP"),
            FinishReason::MaxTokens => write!(f, "MAX_TOKENS"),
            FinishReason::Safety => write!(f, "SAFETY"),
            FinishReason::Recitation => write!(f, "RECITATION"),
            FinishReason::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Clean return type from [`GeminiClient::generate_content`].
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Concatenated text of the first candidate. `None` when absent or blank.
    pub text: Option<String>,
    /// Completion signal of the first candidate, if the provider sent one.
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<UsageMetadata>,
}

impl Completion {
    /// A completion carrying `text` with a normal stop.
    pub fn stop(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some(FinishReason::Stop),
            usage: None,
        }
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Gemini `generateContent` API.
///
/// Construction takes an explicit [`MentorConfig`]; the client never reads
/// the environment on its own.
pub struct GeminiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) generation: GenerationSettings,
    pub(crate) threshold: HarmBlockThreshold,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client from configuration. Fails if the credential is blank.
    pub fn new(config: &MentorConfig) -> Result<Self, MentorError> {
        if config.api_key.trim().is_empty() {
            return Err(MentorError::Configuration(format!(
                "{API_KEY_ENV} is required"
            )));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("mentor-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| MentorError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            generation: config.generation.clone(),
            threshold: config.safety_threshold,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Build the request body for a single prompt with this client's settings.
    pub fn request_for(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest::single_turn(prompt, &self.generation, self.threshold)
    }

    /// Send a `generateContent` request.
    pub async fn generate_content(
        &self,
        body: &GenerateRequest,
    ) -> Result<Completion, ProviderError> {
        debug!(
            "LLM request: model={}, temp={}, top_p={}, top_k={}, max_tokens={}",
            self.model,
            body.generation_config.temperature,
            body.generation_config.top_p,
            body.generation_config.top_k,
            body.generation_config.max_output_tokens,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.endpoint())
            .json(body)
            .send()
            .await
            // The endpoint carries the key; keep it out of error text.
            .map_err(|e| ProviderError::Transport(format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| {
                ProviderError::Transport(format!("failed to read response: {}", e.without_url()))
            })?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(ProviderError::Transport(format!(
                "Gemini API HTTP {status}: {text}"
            )));
        }

        parse_completion(&text)
    }
}

/// Parse a successful `generateContent` body into a [`Completion`].
fn parse_completion(body: &str) -> Result<Completion, ProviderError> {
    let parsed: RawGenerateResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Transport(format!("failed to parse response: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(ProviderError::Transport(format!(
            "Gemini API error: {}",
            err.message
        )));
    }

    if let Some(ref usage) = parsed.usage_metadata {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_token_count.unwrap_or(0),
            usage.candidates_token_count.unwrap_or(0),
            usage.total_token_count.unwrap_or(0),
        );
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        // No candidate to read text from: the prompt itself was refused.
        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::TextUnavailable { reason });
        }
        debug!("LLM output: empty (no candidates)");
        return Ok(Completion {
            usage: parsed.usage_metadata,
            ..Default::default()
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    debug!(
        "LLM output: {} chars text, finish_reason={}",
        text.len(),
        candidate
            .finish_reason
            .as_ref()
            .map_or_else(|| "(none)".to_string(), |r| r.to_string()),
    );

    Ok(Completion {
        text: (!text.trim().is_empty()).then_some(text),
        finish_reason: candidate.finish_reason,
        usage: parsed.usage_metadata,
    })
}
