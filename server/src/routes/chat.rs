//! Chat relay route. Forwards a conversation to the upstream provider.
//!
//! ERROR HANDLING
//! ==============
//! Every provider-side failure is reclassified into [`ApiError`] before the
//! response is built. Raw provider bodies and transport descriptions are
//! logged here and never reach the browser.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::error::{ApiError, ErrorCode};
use crate::llm::types::{Message, UpstreamError, UpstreamFailure};
use crate::state::AppState;

/// `POST /api/chat`: relay `{ messages }` upstream and pass the completion
/// body through unchanged.
///
/// # Errors
///
/// See [`ApiError`] for the status mapping.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let messages = parse_messages(&body)?;

    match state.upstream.complete(&messages).await {
        Ok(completion) => {
            tracing::debug!(model = state.upstream.model(), turns = messages.len(), "chat relayed");
            Ok(([(header::CONTENT_TYPE, "application/json")], completion).into_response())
        }
        Err(e) => Err(relay_error(e)),
    }
}

/// Extract the `messages` array. Anything else (absent body, non-JSON,
/// non-array, malformed entries) is a validation failure.
pub(crate) fn parse_messages(body: &[u8]) -> Result<Vec<Message>, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidMessages)?;
    let Some(messages) = value.get("messages").filter(|m| m.is_array()) else {
        return Err(ApiError::InvalidMessages);
    };
    serde_json::from_value(messages.clone()).map_err(|_| ApiError::InvalidMessages)
}

/// Translate an upstream failure into the caller-facing taxonomy, logging the
/// details that are withheld from the response.
pub(crate) fn relay_error(err: UpstreamError) -> ApiError {
    let code = err.error_code();
    match err {
        UpstreamError::NotConfigured => {
            tracing::warn!(code, "chat request rejected: DEEPSEEK_API_KEY not configured");
            ApiError::NotConfigured
        }
        UpstreamError::Status { status, body } => {
            tracing::error!(code, status, body = %body, "upstream API error");
            ApiError::Upstream { status, failure: UpstreamFailure::from_status(status) }
        }
        UpstreamError::Timeout(bound) => {
            tracing::error!(code, ?bound, "upstream request timed out");
            ApiError::Timeout
        }
        UpstreamError::Transport(detail) | UpstreamError::HttpClientBuild(detail) => {
            tracing::error!(code, error = %detail, "upstream request failed");
            ApiError::Transport(detail)
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
