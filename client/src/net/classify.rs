//! Failure classification for relay calls.
//!
//! DESIGN
//! ======
//! The relay already knows why a call failed and says so in the `kind` field
//! of its error body; that value is trusted as-is. Substring matching is the
//! fallback for failures the relay never saw: the browser failing to reach it,
//! or a non-relay error page in between. The fallback checks, in order,
//! network signatures, an upstream message mentioning "API", then timeout
//! signatures.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use super::types::{ErrorInfo, ErrorKind, RelayErrorBody, RelayFailure};

const NETWORK_SIGNATURES: [&str; 3] = ["Failed to fetch", "NetworkError", "Load failed"];
const TIMEOUT_SIGNATURES: [&str; 3] = ["timeout", "timed out", "Timeout"];

/// Classify one failed relay call into a user-facing [`ErrorInfo`].
#[must_use]
pub fn classify(failure: &RelayFailure) -> ErrorInfo {
    match failure {
        RelayFailure::Transport(detail) => ErrorInfo::new(classify_text(detail, None)),
        RelayFailure::Status { status, body } => classify_status(*status, body.as_ref()),
        RelayFailure::MalformedCompletion => ErrorInfo::new(ErrorKind::Unknown),
    }
}

fn classify_status(status: u16, body: Option<&RelayErrorBody>) -> ErrorInfo {
    let Some(body) = body else {
        return ErrorInfo::new(classify_text(&format!("Server returned status {status}"), None));
    };
    match body.kind.as_deref().and_then(structured_kind) {
        // The relay's own message is already written for visitors.
        Some(kind @ (ErrorKind::Api | ErrorKind::Timeout)) if !body.message.is_empty() => {
            ErrorInfo::with_message(kind, body.message.clone())
        }
        Some(kind) => ErrorInfo::new(kind),
        None => ErrorInfo::new(classify_text(&body.message, Some(&body.message))),
    }
}

/// Map a relay-computed kind onto the widget taxonomy.
fn structured_kind(kind: &str) -> Option<ErrorKind> {
    match kind {
        "api" | "configuration" => Some(ErrorKind::Api),
        "timeout" => Some(ErrorKind::Timeout),
        "validation" | "server" => Some(ErrorKind::Unknown),
        _ => None,
    }
}

/// Heuristic classification over free-form error text.
///
/// `upstream_message` is the message from an error payload, when one exists;
/// only that text is eligible for the "API" match.
fn classify_text(text: &str, upstream_message: Option<&str>) -> ErrorKind {
    if NETWORK_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        ErrorKind::Network
    } else if upstream_message.is_some_and(|m| m.contains("API")) {
        ErrorKind::Api
    } else if TIMEOUT_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        ErrorKind::Timeout
    } else {
        ErrorKind::Unknown
    }
}
