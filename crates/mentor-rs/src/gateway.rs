//! The boundary to the generative model.
//!
//! [`GenerativeModel`] is the seam: prompt in, [`Completion`] or
//! [`ProviderError`] out. [`GeminiClient`] is the production implementation;
//! tests plug in scripted models.
//!
//! [`ModelGateway`] turns a completion into a [`ModelOutcome`] with one
//! exhaustive decision table:
//!
//! | Provider signal | Outcome |
//! |-----------------|---------|
//! | `STOP` with text | [`ModelOutcome::Text`] |
//! | `STOP` without text | [`ModelOutcome::Empty`] |
//! | `MAX_TOKENS` with text | [`ModelOutcome::Text`] |
//! | `MAX_TOKENS` without text | [`ModelOutcome::Truncated`] |
//! | `SAFETY` family | [`ModelOutcome::Blocked`] |
//! | `RECITATION` | [`ModelOutcome::Recitation`] |
//! | anything else, or no signal | [`ModelOutcome::Unknown`] |
//! | [`ProviderError::TextUnavailable`] | [`ModelOutcome::TextUnavailable`] |
//! | [`ProviderError::Transport`] | `Err(MentorError::Transport)` |
//!
//! Every outcome except `Text` maps to a fixed in-character string via
//! [`ModelOutcome::into_text`]. Transport failures propagate; the
//! [`ResponsePipeline`](crate::pipeline::ResponsePipeline) catches them.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use crate::error::{MentorError, ProviderError};
use crate::{Completion, FinishReason, GeminiClient};

pub const EMPTY_STOP_TEXT: &str = "I'm reflecting on your words...";

pub const TRUNCATED_TEXT: &str = "Let me pause here and continue this thought...";

pub const BLOCKED_TEXT: &str = "I sense your question touches on sensitive ground. Let me guide you \
    with wisdom while being mindful of our conversation's direction. Could you perhaps share more \
    context about what you're truly seeking?";

pub const RECITATION_TEXT: &str = "I notice our conversation may be echoing familiar patterns. Let me \
    offer you fresh perspective and original guidance instead.";

pub const UNKNOWN_TEXT: &str =
    "I'm taking a moment to gather my thoughts. Please share more about what weighs on your mind.";

pub const TEXT_UNAVAILABLE_TEXT: &str = "I understand you're seeking guidance, but I need to \
    approach this topic more carefully. Could you help me understand what specific aspect of \
    wisdom you're looking for?";

/// Future returned by [`GenerativeModel::generate`].
pub type ModelFuture<'a> = BoxFuture<'a, Result<Completion, ProviderError>>;

/// A text-generation backend.
///
/// Uses a boxed future so that the trait is dyn-compatible.
pub trait GenerativeModel: Send + Sync {
    /// Run one generation for `prompt`. One call, no retries.
    fn generate<'a>(&'a self, prompt: &'a str) -> ModelFuture<'a>;

    /// Model identifier for logs and diagnostics.
    fn model_name(&self) -> &str {
        "unknown"
    }
}

impl GenerativeModel for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> ModelFuture<'a> {
        Box::pin(async move {
            let body = self.request_for(prompt);
            self.generate_content(&body).await
        })
    }

    fn model_name(&self) -> &str {
        self.model()
    }
}

impl<T: GenerativeModel + ?Sized> GenerativeModel for Arc<T> {
    fn generate<'a>(&'a self, prompt: &'a str) -> ModelFuture<'a> {
        (**self).generate(prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Normalized result of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    /// Usable model text.
    Text(String),
    /// Normal stop, but no text.
    Empty,
    /// Length limit hit before any text was produced.
    Truncated,
    /// Safety filter fired.
    Blocked,
    /// Recitation filter fired.
    Recitation,
    /// Unrecognized or missing completion signal.
    Unknown,
    /// The provider refused before producing a candidate.
    TextUnavailable,
}

impl ModelOutcome {
    /// Apply the decision table to a completion.
    pub fn from_completion(completion: Completion) -> Self {
        match (completion.finish_reason, completion.text) {
            (Some(FinishReason::Stop), Some(text)) => ModelOutcome::Text(text),
            (Some(FinishReason::Stop), None) => ModelOutcome::Empty,
            (Some(FinishReason::MaxTokens), Some(text)) => ModelOutcome::Text(text),
            (Some(FinishReason::MaxTokens), None) => ModelOutcome::Truncated,
            (Some(FinishReason::Safety), _) => ModelOutcome::Blocked,
            (Some(FinishReason::Recitation), _) => ModelOutcome::Recitation,
            (Some(FinishReason::Other(_)), _) | (None, _) => ModelOutcome::Unknown,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ModelOutcome::Text(_))
    }

    /// The display string: model text, or the fixed fallback for this outcome.
    pub fn into_text(self) -> String {
        match self {
            ModelOutcome::Text(text) => text,
            ModelOutcome::Empty => EMPTY_STOP_TEXT.to_string(),
            ModelOutcome::Truncated => TRUNCATED_TEXT.to_string(),
            ModelOutcome::Blocked => BLOCKED_TEXT.to_string(),
            ModelOutcome::Recitation => RECITATION_TEXT.to_string(),
            ModelOutcome::Unknown => UNKNOWN_TEXT.to_string(),
            ModelOutcome::TextUnavailable => TEXT_UNAVAILABLE_TEXT.to_string(),
        }
    }
}

/// Wraps a [`GenerativeModel`] and normalizes its results.
pub struct ModelGateway {
    model: Box<dyn GenerativeModel>,
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("model", &self.model.model_name())
            .finish()
    }
}

impl ModelGateway {
    pub fn new(model: impl GenerativeModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    pub fn from_boxed(model: Box<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Send `prompt` to the model and classify the result.
    ///
    /// Returns `Err` only for transport failures. An empty prompt is a
    /// validation error and is never sent.
    pub async fn generate(&self, prompt: &str) -> Result<ModelOutcome, MentorError> {
        if prompt.trim().is_empty() {
            return Err(MentorError::Validation("prompt is empty".to_string()));
        }

        match self.model.generate(prompt).await {
            Ok(completion) => {
                let reason = completion.finish_reason.clone();
                let outcome = ModelOutcome::from_completion(completion);
                if outcome.is_text() {
                    debug!("Model returned text (finish_reason={reason:?})");
                } else {
                    warn!("Model outcome {outcome:?} (finish_reason={reason:?}); using fallback text");
                }
                Ok(outcome)
            }
            Err(ProviderError::TextUnavailable { reason }) => {
                warn!("Model text unavailable (block reason: {reason}); using fallback text");
                Ok(ModelOutcome::TextUnavailable)
            }
            Err(err @ ProviderError::Transport(_)) => {
                error!("Model call failed: {err}");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed result and records the prompts it was given.
    pub(crate) struct ScriptedModel {
        result: Result<Completion, ProviderError>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(result: Result<Completion, ProviderError>) -> Self {
            Self {
                result,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl GenerativeModel for ScriptedModel {
        fn generate<'a>(&'a self, prompt: &'a str) -> ModelFuture<'a> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let result = self.result.clone();
            Box::pin(async move { result })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn completion(reason: Option<FinishReason>, text: Option<&str>) -> Completion {
        Completion {
            text: text.map(str::to_string),
            finish_reason: reason,
            usage: None,
        }
    }

    async fn outcome_for(result: Result<Completion, ProviderError>) -> Result<ModelOutcome, MentorError> {
        ModelGateway::new(ScriptedModel::new(result))
            .generate("prompt")
            .await
    }

    #[tokio::test]
    async fn stop_with_text_is_text() {
        let outcome = outcome_for(Ok(Completion::stop("Walk on."))).await.unwrap();
        assert_eq!(outcome, ModelOutcome::Text("Walk on.".into()));
    }

    #[tokio::test]
    async fn stop_without_text_reflects() {
        let outcome = outcome_for(Ok(completion(Some(FinishReason::Stop), None)))
            .await
            .unwrap();
        assert_eq!(outcome.into_text(), EMPTY_STOP_TEXT);
    }

    #[tokio::test]
    async fn max_tokens_keeps_partial_text() {
        let outcome = outcome_for(Ok(completion(Some(FinishReason::MaxTokens), Some("Half a"))))
            .await
            .unwrap();
        assert_eq!(outcome.into_text(), "Half a");

        let outcome = outcome_for(Ok(completion(Some(FinishReason::MaxTokens), None)))
            .await
            .unwrap();
        assert_eq!(outcome.into_text(), TRUNCATED_TEXT);
    }

    #[tokio::test]
    async fn filters_deflect_in_character() {
        let blocked = outcome_for(Ok(completion(Some(FinishReason::Safety), Some("partial"))))
            .await
            .unwrap();
        assert_eq!(blocked, ModelOutcome::Blocked);
        assert_eq!(blocked.into_text(), BLOCKED_TEXT);

        let recited = outcome_for(Ok(completion(Some(FinishReason::Recitation), None)))
            .await
            .unwrap();
        assert_eq!(recited.into_text(), RECITATION_TEXT);
    }

    #[tokio::test]
    async fn unknown_or_missing_signal_asks_for_more() {
        let other = outcome_for(Ok(completion(Some(FinishReason::Other("OTHER".into())), Some("x"))))
            .await
            .unwrap();
        assert_eq!(other.into_text(), UNKNOWN_TEXT);

        let missing = outcome_for(Ok(completion(None, None))).await.unwrap();
        assert_eq!(missing, ModelOutcome::Unknown);
    }

    #[tokio::test]
    async fn text_unavailable_asks_clarifying_question() {
        let outcome = outcome_for(Err(ProviderError::TextUnavailable {
            reason: "SAFETY".into(),
        }))
        .await
        .unwrap();
        assert_eq!(outcome.into_text(), TEXT_UNAVAILABLE_TEXT);
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let err = outcome_for(Err(ProviderError::Transport("HTTP 503".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, MentorError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_prompt_is_never_sent() {
        let model = ScriptedModel::new(Ok(Completion::stop("x")));
        let gateway = ModelGateway::new(model);
        let err = gateway.generate("   ").await.unwrap_err();
        assert!(matches!(err, MentorError::Validation(_)));
    }

    #[test]
    fn every_fallback_is_non_empty() {
        for outcome in [
            ModelOutcome::Empty,
            ModelOutcome::Truncated,
            ModelOutcome::Blocked,
            ModelOutcome::Recitation,
            ModelOutcome::Unknown,
            ModelOutcome::TextUnavailable,
        ] {
            assert!(!outcome.into_text().is_empty());
        }
    }
}
