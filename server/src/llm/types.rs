//! Chat-completion wire types and upstream errors.
//!
//! Only the request side is typed. Successful completion bodies are relayed
//! as opaque bytes; the widget validates the shape it consumes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the upstream completion client.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No usable credential is configured.
    #[error("upstream API key not configured")]
    NotConfigured,

    /// No response arrived within the configured bound.
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// The request never produced an HTTP response (DNS, connect, TLS, ...).
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status.
    #[error("upstream response error: status {status}")]
    Status { status: u16, body: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for UpstreamError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::Timeout(_) => "E_UPSTREAM_TIMEOUT",
            Self::Transport(_) => "E_UPSTREAM_TRANSPORT",
            Self::Status { .. } => "E_UPSTREAM_STATUS",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// Provider-side failure classes, derived from the upstream HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamFailure {
    Unauthorized,
    RateLimited,
    Unavailable,
    Generic,
}

impl UpstreamFailure {
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            429 => Self::RateLimited,
            503 => Self::Unavailable,
            _ => Self::Generic,
        }
    }

    /// Caller-safe message for this failure class.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unauthorized => "Invalid API key. Please check your DeepSeek API key.",
            Self::RateLimited => "Rate limit exceeded. Please try again later.",
            Self::Unavailable => "DeepSeek service is temporarily unavailable.",
            Self::Generic => "The chat service is currently unavailable.",
        }
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Outbound body for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
