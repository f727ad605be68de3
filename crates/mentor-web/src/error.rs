//! HTTP error responses.
//!
//! Every failure leaves the server as `{"error": "<message>"}` with a status
//! code that tells the caller whose fault it was: 400 for bad input, 508 for
//! a mentor that took too long, 500 for everything else.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mentor_rs::error::MentorError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Provider call exceeded the request deadline.
    ///
    /// 508 is what existing clients of this API already key on for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::LOOP_DETECTED,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl From<MentorError> for ApiError {
    fn from(err: MentorError) -> Self {
        match err {
            MentorError::InvalidOption(_) => {
                ApiError::bad_request("Invalid mentor_option. Must be 0, 1, or 2")
            }
            MentorError::Validation(msg) => ApiError::bad_request(msg),
            MentorError::Configuration(_) | MentorError::Transport(_) => {
                ApiError::internal(format!("Internal server error: {err}"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected: {self}");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
