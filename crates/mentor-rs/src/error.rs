//! Error taxonomy.
//!
//! [`MentorError`] is what callers see: bad input, bad configuration, or an
//! unreachable provider. [`ProviderError`] is narrower and stays between the
//! HTTP client and the [`ModelGateway`](crate::gateway::ModelGateway), which
//! turns the recoverable variant into an in-character reply.
//!
//! Content-filter outcomes are not errors at all; they are
//! [`ModelOutcome`](crate::gateway::ModelOutcome) variants.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MentorError {
    /// Mentor option outside the registry.
    #[error("invalid mentor option {0}: must be 0, 1, or 2")]
    InvalidOption(i64),

    /// Missing or malformed caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing credential or unusable client settings. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model provider could not be reached or returned an error.
    #[error("transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, MentorError>;

/// Failure raised by a [`GenerativeModel`](crate::gateway::GenerativeModel).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered, but there is no text to read because the
    /// request was refused before a candidate was produced.
    #[error("response text unavailable (block reason: {reason})")]
    TextUnavailable { reason: String },

    /// Network failure, non-success status, or an unparseable body.
    #[error("{0}")]
    Transport(String),
}

impl From<ProviderError> for MentorError {
    fn from(err: ProviderError) -> Self {
        MentorError::Transport(err.to_string())
    }
}

impl From<MentorError> for String {
    fn from(err: MentorError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_option_names_the_value() {
        let err = MentorError::InvalidOption(5);
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains("0, 1, or 2"));
    }

    #[test]
    fn provider_error_becomes_transport() {
        let err: MentorError = ProviderError::Transport("HTTP 503".into()).into();
        assert!(matches!(err, MentorError::Transport(ref m) if m == "HTTP 503"));
    }

    #[test]
    fn text_unavailable_mentions_reason() {
        let err = ProviderError::TextUnavailable {
            reason: "SAFETY".into(),
        };
        assert!(err.to_string().contains("SAFETY"));
    }
}
