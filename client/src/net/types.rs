//! Wire DTOs for the relay and health endpoints.
//!
//! DESIGN
//! ======
//! The relay passes the provider's completion body through untouched, so the
//! widget narrows it here: only `choices[0].message.content` is read, and any
//! other shape is reported as [`RelayFailure::MalformedCompletion`] instead of
//! reaching the UI layer.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::state::conversation::Message;

/// Closed set of failure kinds the widget distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Api,
    Timeout,
    Unknown,
}

impl ErrorKind {
    /// Canned user-facing text for this kind.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Network => "Can't reach the server. Please check that the server is running.",
            Self::Api => "The AI service is currently unavailable. Please try again later.",
            Self::Timeout => "The request took too long. Please try again.",
            Self::Unknown => "Something went wrong. Please try again later.",
        }
    }
}

/// Classified failure of one relay call. Derived per call and shown once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: kind.default_message().to_owned() }
    }

    #[must_use]
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Error body returned by the relay for every non-200 response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RelayErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    /// Structured kind computed by the relay. Absent on responses that did
    /// not come from the relay itself (e.g. an intermediate proxy).
    #[serde(default)]
    pub kind: Option<String>,
}

/// `GET /api/health` response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthReport {
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// `POST /api/chat` request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
}

/// What a relay call can fail with, before classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayFailure {
    /// The browser could not complete the request at all.
    Transport(String),
    /// The relay answered with a non-success status.
    Status { status: u16, body: Option<RelayErrorBody> },
    /// A 200 whose body lacks `choices[0].message.content`.
    MalformedCompletion,
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract the assistant text from a completion body.
///
/// Returns `None` unless the body is JSON with a non-empty `choices` array
/// whose first entry carries a non-empty `message.content` string.
#[must_use]
pub fn completion_text(body: &str) -> Option<String> {
    let completion: Completion = serde_json::from_str(body).ok()?;
    let content = completion.choices.into_iter().next()?.message?.content?;
    (!content.trim().is_empty()).then_some(content)
}
