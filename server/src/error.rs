//! HTTP error surface shared by all API routes.
//!
//! DESIGN
//! ======
//! Every failure leaves the server as `{ error, message, kind }`. `error` is
//! a short label, `message` is safe to show to a visitor, and `kind` is the
//! structured taxonomy tag the widget uses instead of matching on text.
//! Provider bodies and transport descriptions are logged, never serialized.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::llm::types::UpstreamFailure;
use crate::services::contact::ContactError;

/// Grepable error code for structured logs.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

/// Taxonomy tag serialized into every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Configuration,
    Api,
    Timeout,
    Server,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request body has no `messages` array")]
    InvalidMessages,

    #[error("upstream API key not configured")]
    NotConfigured,

    #[error("upstream rejected request with status {status}")]
    Upstream { status: u16, failure: UpstreamFailure },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    Contact(#[from] ContactError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    pub kind: ErrorKind,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMessages => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Contact(e) => e.status(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMessages => ErrorKind::Validation,
            Self::NotConfigured => ErrorKind::Configuration,
            Self::Upstream { .. } => ErrorKind::Api,
            Self::Timeout => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Server,
            Self::Contact(e) => e.kind(),
        }
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let (error, message) = match self {
            Self::InvalidMessages => ("Invalid messages format", "Request body must contain a `messages` array."),
            Self::NotConfigured => ("Configuration error", "DeepSeek API key not configured."),
            Self::Upstream { failure, .. } => ("DeepSeek API error", failure.message()),
            Self::Timeout => ("Timeout", "Request timed out. Please try again."),
            Self::Transport(_) => ("Server error", "The chat service could not be reached. Please try again later."),
            Self::Contact(e) => (e.label(), e.public_message()),
        };
        ErrorBody { error, message, kind: self.kind() }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMessages => "E_INVALID_MESSAGES",
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::Upstream { .. } => "E_UPSTREAM_STATUS",
            Self::Timeout => "E_UPSTREAM_TIMEOUT",
            Self::Transport(_) => "E_UPSTREAM_TRANSPORT",
            Self::Contact(e) => e.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
