//! OpenAI-compatible chat-completion client (DeepSeek by default).
//!
//! Sends one non-streaming completion request per call with a bearer
//! credential and a hard request timeout. No retries: every failure is
//! reported to the caller once.

use axum::body::Bytes;

use super::types::{CompletionRequest, Message, UpstreamError};
use crate::config::UpstreamConfig;

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Build a client whose every request is bounded by `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Return the configured model name (e.g. `"deepseek-chat"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Forward `messages` upstream and return the raw success body.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::NotConfigured`] before any network I/O when no key is set.
    /// - [`UpstreamError::Timeout`] when the bound elapses.
    /// - [`UpstreamError::Status`] for non-2xx responses (body kept for logging).
    /// - [`UpstreamError::Transport`] for everything else.
    pub async fn complete(&self, messages: &[Message]) -> Result<Bytes, UpstreamError> {
        let api_key = self.config.api_key().ok_or(UpstreamError::NotConfigured)?;
        let body = CompletionRequest { model: &self.config.model, messages, stream: false };

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;
        if !status.is_success() {
            return Err(UpstreamError::Status { status: status.as_u16(), body: String::from_utf8_lossy(&bytes).into_owned() });
        }
        Ok(bytes)
    }

    fn transport_error(&self, err: &reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.config.timeout)
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
