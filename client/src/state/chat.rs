//! Chat session: conversation, connectivity, and the rendered thread.
//!
//! DESIGN
//! ======
//! One [`ChatSession`] per widget instance, created by the caller and passed
//! to every operation. A submission moves `Idle -> Sending -> Idle`; the
//! `processing` latch admits one transition out of `Idle` at a time and drops
//! (never queues) anything that arrives while a call is in flight. The latch
//! is released on both the success and the failure path.
//!
//! Async flow lives in [`submit`] and [`probe`], which only touch the session
//! through a [`SessionHandle`] between awaits, so the same code drives a
//! Leptos signal in the browser and a `RefCell` in tests.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::cell::RefCell;

use leptos::prelude::{RwSignal, Update};

use super::connectivity::{ConnectivityMonitor, HealthStatus};
use super::conversation::{Conversation, Message};
use crate::net::api::RelayTransport;
use crate::net::classify::classify;
use crate::net::types::{ErrorInfo, HealthReport, RelayFailure};

pub const WELCOME_ONLINE: &str = "Hi! I'm the AI assistant for this portfolio. I can tell you about \
skills, experience, education, projects, or how to get in touch. What would you like to know?";

pub const WELCOME_OFFLINE: &str = "Hi! I'm currently offline, but you can still browse the portfolio. \
The AI chat will be available once the service is running.";

pub const OFFLINE_ADVISORY: &str =
    "I'm currently offline. Please wait for the AI service to come back online, or try refreshing the page.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadRole {
    User,
    Assistant,
    Error,
}

/// One bubble in the visible thread. Distinct from [`Message`]: canned notices
/// and errors are shown here but never sent upstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadEntry {
    pub id: String,
    pub role: ThreadRole,
    pub text: String,
}

impl ThreadEntry {
    fn new(role: ThreadRole, text: impl Into<String>) -> Self {
        Self { id: uuid::Uuid::new_v4().to_string(), role, text: text.into() }
    }
}

/// Outcome of [`ChatSession::begin_submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Send this payload; the latch is now held.
    Dispatch(Vec<Message>),
    /// Blank input.
    Ignored,
    /// A call is already in flight.
    Dropped,
    /// Offline: advisory shown, nothing sent.
    RejectedOffline,
}

#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    connectivity: ConnectivityMonitor,
    thread: Vec<ThreadEntry>,
    processing: bool,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_conversation(conversation: Conversation) -> Self {
        Self { conversation, ..Self::default() }
    }

    /// Gate and start a submission.
    pub fn begin_submit(&mut self, text: &str) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }
        if self.processing {
            return Submission::Dropped;
        }
        if self.connectivity.is_offline() {
            self.thread.push(ThreadEntry::new(ThreadRole::Assistant, OFFLINE_ADVISORY));
            return Submission::RejectedOffline;
        }

        self.processing = true;
        self.thread.push(ThreadEntry::new(ThreadRole::User, text));
        self.conversation.append_user_message(text);
        Submission::Dispatch(self.conversation.build_payload())
    }

    /// Complete the in-flight submission and release the latch.
    ///
    /// Returns the classified failure, if any, for the caller to log.
    pub fn finish_submit(&mut self, outcome: Result<String, RelayFailure>) -> Option<ErrorInfo> {
        self.processing = false;
        match outcome {
            Ok(reply) => {
                self.conversation.append_assistant_message(reply.clone());
                self.thread.push(ThreadEntry::new(ThreadRole::Assistant, reply));
                self.connectivity.record_success();
                None
            }
            Err(failure) => {
                let info = classify(&failure);
                self.thread.push(ThreadEntry::new(ThreadRole::Error, info.message.clone()));
                self.connectivity.record_failure(&info);
                Some(info)
            }
        }
    }

    /// Show the welcome message once, on an empty thread.
    pub fn greet(&mut self) {
        if self.thread.is_empty() {
            let text = if self.connectivity.is_online() { WELCOME_ONLINE } else { WELCOME_OFFLINE };
            self.thread.push(ThreadEntry::new(ThreadRole::Assistant, text));
        }
    }

    pub fn apply_health(&mut self, report: Result<HealthReport, String>, now_ms: f64) -> HealthStatus {
        self.connectivity.apply_probe(report, now_ms).clone()
    }

    /// Start over: empties history and the visible thread.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.thread.clear();
    }

    #[must_use]
    pub fn thread(&self) -> &[ThreadEntry] {
        &self.thread
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }
}

// =============================================================================
// SessionHandle
// =============================================================================

/// Short, synchronous access to a shared session.
///
/// Returns `None` if the session has been disposed (an unmounted widget).
pub trait SessionHandle {
    fn with_session<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> Option<R>;
}

impl SessionHandle for RefCell<ChatSession> {
    fn with_session<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl SessionHandle for RwSignal<ChatSession> {
    fn with_session<R>(&self, f: impl FnOnce(&mut ChatSession) -> R) -> Option<R> {
        self.try_update(f)
    }
}

// =============================================================================
// Async flows
// =============================================================================

/// Submit `text` through `transport`.
///
/// Returns `true` if a relay call was issued. At most one call is in flight
/// per session; overlapping submits return `false` without touching the
/// network.
pub async fn submit<S, T>(session: &S, transport: &T, text: &str) -> bool
where
    S: SessionHandle,
    T: RelayTransport,
{
    let Some(Submission::Dispatch(payload)) = session.with_session(|s| s.begin_submit(text)) else {
        return false;
    };

    let outcome = transport.send_chat(&payload).await;
    if let Some(Some(info)) = session.with_session(|s| s.finish_submit(outcome)) {
        leptos::logging::warn!("chat relay failed ({:?}): {}", info.kind, info.message);
    }
    true
}

/// Run a health probe and record its result.
pub async fn probe<S, T>(session: &S, transport: &T, now_ms: f64)
where
    S: SessionHandle,
    T: RelayTransport,
{
    let report = transport.health().await;
    if let Err(e) = &report {
        leptos::logging::warn!("health probe failed: {e}");
    }
    session.with_session(|s| s.apply_health(report, now_ms));
}
