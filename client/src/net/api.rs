//! HTTP transport to the relay and health endpoints.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning errors, since these endpoints are only
//! meaningful in the browser. Session logic is written against
//! [`RelayTransport`] so tests substitute a scripted transport.
//!
//! ERROR HANDLING
//! ==============
//! Every failure comes back as a value ([`RelayFailure`] or a `String` for the
//! health probe). Nothing here panics, so a broken relay degrades the widget
//! without taking the page down.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use super::types::{HealthReport, RelayFailure};
use crate::state::conversation::Message;
#[cfg(any(test, feature = "csr"))]
use super::types::{RelayErrorBody, completion_text};

/// The two calls the widget makes against the server.
pub trait RelayTransport {
    /// `POST /api/chat` with the full payload; resolves to the assistant text.
    fn send_chat(&self, messages: &[Message]) -> impl Future<Output = Result<String, RelayFailure>>;

    /// `GET /api/health`.
    fn health(&self) -> impl Future<Output = Result<HealthReport, String>>;
}

/// [`RelayTransport`] over the page's own origin (or an explicit base URL).
#[derive(Clone, Debug, Default)]
pub struct HttpRelay {
    base: String,
}

impl HttpRelay {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into().trim_end_matches('/').to_owned() }
    }
}

#[cfg(any(test, feature = "csr"))]
fn chat_endpoint(base: &str) -> String {
    format!("{base}/api/chat")
}

#[cfg(any(test, feature = "csr"))]
fn health_endpoint(base: &str) -> String {
    format!("{base}/api/health")
}

#[cfg(any(test, feature = "csr"))]
fn health_failed_message(status: u16) -> String {
    format!("health check failed: {status}")
}

/// Turn a relay response into the assistant text or a typed failure.
#[cfg(any(test, feature = "csr"))]
fn decode_chat_response(status: u16, text: &str) -> Result<String, RelayFailure> {
    if !(200..300).contains(&status) {
        let body = serde_json::from_str::<RelayErrorBody>(text).ok();
        return Err(RelayFailure::Status { status, body });
    }
    completion_text(text).ok_or(RelayFailure::MalformedCompletion)
}

impl RelayTransport for HttpRelay {
    async fn send_chat(&self, messages: &[Message]) -> Result<String, RelayFailure> {
        #[cfg(feature = "csr")]
        {
            let payload = super::types::ChatRequest { messages };
            let resp = gloo_net::http::Request::post(&chat_endpoint(&self.base))
                .json(&payload)
                .map_err(|e| RelayFailure::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| RelayFailure::Transport(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| RelayFailure::Transport(e.to_string()))?;
            decode_chat_response(status, &text)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.base, messages);
            Err(RelayFailure::Transport("not available on server".to_owned()))
        }
    }

    async fn health(&self) -> Result<HealthReport, String> {
        #[cfg(feature = "csr")]
        {
            let resp = gloo_net::http::Request::get(&health_endpoint(&self.base))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !resp.ok() {
                return Err(health_failed_message(resp.status()));
            }
            resp.json::<HealthReport>().await.map_err(|e| e.to_string())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = &self.base;
            Err("not available on server".to_owned())
        }
    }
}
