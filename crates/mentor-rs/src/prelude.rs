//! Convenience re-exports for common `mentor-rs` types.
//!
//! ```ignore
//! use mentor_rs::prelude::*;
//! ```

pub use crate::{Completion, FinishReason, GeminiClient};

pub use crate::classify::{Classifier, ConversationType, classify};
pub use crate::compose::{PromptRequest, compose};
pub use crate::config::{GenerationSettings, HarmBlockThreshold, MentorConfig};
pub use crate::error::{MentorError, ProviderError};
pub use crate::gateway::{GenerativeModel, ModelFuture, ModelGateway, ModelOutcome};
pub use crate::persona::{MentorKind, Persona, all_personas, get_persona};
pub use crate::pipeline::{Reply, ReplySource, ResponsePipeline};
pub use crate::sanitize::{Sanitizer, sanitize};
