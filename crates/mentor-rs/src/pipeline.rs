//! Classify, compose, generate, sanitize.
//!
//! [`ResponsePipeline::respond`] is the public contract of the crate: it
//! always returns a non-empty string and never fails. Whatever goes wrong
//! below it (a transport error, an empty prompt, a panic in a model
//! implementation) is replaced by a canned reply that fits the conversation:
//! a farewell, a greeting that names the mentor, or a request to ask again.
//!
//! The pipeline holds no per-request state; one instance serves concurrent
//! callers.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::classify::{Classifier, ConversationType};
use crate::compose::compose;
use crate::error::MentorError;
use crate::gateway::{GenerativeModel, ModelGateway, ModelOutcome};
use crate::persona::Persona;
use crate::sanitize::Sanitizer;

pub const FAREWELL_FALLBACK: &str =
    "Until we meet again on your journey of growth. Walk your path with wisdom.";

pub const QUESTION_FALLBACK: &str =
    "I'm reflecting deeply on your question. Please try asking again, and I'll offer my guidance.";

/// Canned reply used when the model path fails entirely.
pub fn fallback_reply(persona: &Persona, conversation_type: ConversationType) -> String {
    match conversation_type {
        ConversationType::Farewell => FAREWELL_FALLBACK.to_string(),
        ConversationType::Greeting => format!(
            "Greetings, seeker. I am {}. How may I guide you today?",
            persona.name
        ),
        ConversationType::Question => QUESTION_FALLBACK.to_string(),
    }
}

/// Where a reply's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Model-generated text.
    Model,
    /// The model answered but the gateway substituted fixed text.
    GatewayFallback,
    /// The model path failed; the pipeline's canned reply was used.
    SafetyNet,
}

/// A reply plus how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub conversation_type: ConversationType,
    pub source: ReplySource,
    /// Failure that triggered the safety net, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Orchestrates one mentor reply per call.
#[derive(Debug)]
pub struct ResponsePipeline {
    gateway: ModelGateway,
    classifier: Classifier,
    sanitizer: Sanitizer,
}

impl ResponsePipeline {
    pub fn new(gateway: ModelGateway) -> Self {
        Self {
            gateway,
            classifier: Classifier::default(),
            sanitizer: Sanitizer::default(),
        }
    }

    /// Shorthand for `ResponsePipeline::new(ModelGateway::new(model))`.
    pub fn with_model(model: impl GenerativeModel + 'static) -> Self {
        Self::new(ModelGateway::new(model))
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// Reply to `message` as `persona`. Never empty, never fails.
    pub async fn respond(&self, persona: &Persona, message: &str) -> String {
        self.respond_detailed(persona, message).await.text
    }

    /// Like [`respond`](Self::respond), but reports the conversation type
    /// and where the text came from.
    pub async fn respond_detailed(&self, persona: &Persona, message: &str) -> Reply {
        let conversation_type = self.classifier.classify(message);
        info!(
            "Responding as {} to a {conversation_type} ({} chars)",
            persona.name,
            message.len()
        );

        let attempt = AssertUnwindSafe(self.generate(persona, message, conversation_type))
            .catch_unwind()
            .await;

        let failure = match attempt {
            Ok(Ok(outcome)) => {
                let source = if outcome.is_text() {
                    ReplySource::Model
                } else {
                    ReplySource::GatewayFallback
                };
                let text = self.sanitizer.apply(&outcome.into_text());
                if !text.trim().is_empty() {
                    debug!("Reply ready: {} chars from {source:?}", text.len());
                    return Reply {
                        text,
                        conversation_type,
                        source,
                        error: None,
                    };
                }
                "model reply was empty after sanitization".to_string()
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => {
                error!("Model call panicked while responding as {}", persona.name);
                "model call panicked".to_string()
            }
        };

        warn!("Using {conversation_type} fallback for {}: {failure}", persona.name);
        Reply {
            text: fallback_reply(persona, conversation_type),
            conversation_type,
            source: ReplySource::SafetyNet,
            error: Some(failure),
        }
    }

    async fn generate(
        &self,
        persona: &Persona,
        message: &str,
        conversation_type: ConversationType,
    ) -> Result<ModelOutcome, MentorError> {
        let prompt = compose(persona, message, conversation_type);
        debug!("Prompt composed: {} chars", prompt.len());
        self.gateway.generate(&prompt).await
    }
}
