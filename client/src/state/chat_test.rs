use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::executor::block_on;

use super::*;
use crate::net::types::{ErrorKind, RelayErrorBody};
use crate::state::connectivity::{Connectivity, PROBE_FAILURE_MESSAGE};
use crate::state::conversation::Role;

// =============================================================
// ScriptedTransport
// =============================================================

/// Pending on first poll, ready on the second. Lets a concurrent task run
/// while a relay call is "in flight".
#[derive(Default)]
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<String, RelayFailure>>>,
    payloads: RefCell<Vec<Vec<Message>>>,
    chat_calls: Cell<usize>,
    health: Result<HealthReport, String>,
}

impl ScriptedTransport {
    fn with_replies(replies: Vec<Result<String, RelayFailure>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            payloads: RefCell::new(Vec::new()),
            chat_calls: Cell::new(0),
            health: Ok(online_report()),
        }
    }

    fn with_health(health: Result<HealthReport, String>) -> Self {
        Self { health, ..Self::with_replies(Vec::new()) }
    }
}

impl RelayTransport for ScriptedTransport {
    async fn send_chat(&self, messages: &[Message]) -> Result<String, RelayFailure> {
        self.chat_calls.set(self.chat_calls.get() + 1);
        self.payloads.borrow_mut().push(messages.to_vec());
        YieldOnce::default().await;
        self.replies.borrow_mut().pop_front().unwrap_or(Err(RelayFailure::MalformedCompletion))
    }

    async fn health(&self) -> Result<HealthReport, String> {
        self.health.clone()
    }
}

fn online_report() -> HealthReport {
    HealthReport { status: "online".to_owned(), model: Some("deepseek-chat".to_owned()), message: None }
}

fn offline_report() -> HealthReport {
    HealthReport { status: "offline".to_owned(), model: None, message: Some("DeepSeek API key not configured.".to_owned()) }
}

fn online_session() -> RefCell<ChatSession> {
    let mut session = ChatSession::new();
    session.apply_health(Ok(online_report()), 0.0);
    RefCell::new(session)
}

fn network_failure() -> RelayFailure {
    RelayFailure::Transport("TypeError: Failed to fetch".to_owned())
}

fn rate_limited() -> RelayFailure {
    RelayFailure::Status {
        status: 429,
        body: Some(RelayErrorBody {
            error: "DeepSeek API error".to_owned(),
            message: "Rate limit exceeded. Please try again later.".to_owned(),
            kind: Some("api".to_owned()),
        }),
    }
}

// =============================================================
// success path
// =============================================================

#[test]
fn successful_reply_is_appended_to_history_and_thread() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Ok("Hello!".to_owned())]);

    assert!(block_on(submit(&session, &transport, "hi")));

    let session = session.borrow();
    let history: Vec<_> = session.conversation().history().iter().cloned().collect();
    assert_eq!(history, vec![Message::new(Role::User, "hi"), Message::new(Role::Assistant, "Hello!")]);
    let roles: Vec<_> = session.thread().iter().map(|e| e.role).collect();
    assert_eq!(roles, vec![ThreadRole::User, ThreadRole::Assistant]);
    assert_eq!(session.thread()[1].text, "Hello!");
    assert!(!session.is_processing());
    assert!(session.connectivity().is_online());
}

#[test]
fn payload_is_system_then_history() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Ok("a1".to_owned()), Ok("a2".to_owned())]);

    block_on(submit(&session, &transport, "q1"));
    block_on(submit(&session, &transport, "q2"));

    let payloads = transport.payloads.borrow();
    assert_eq!(payloads.len(), 2);
    let second = &payloads[1];
    assert_eq!(second[0].role, Role::System);
    let rest: Vec<&str> = second[1..].iter().map(|m| m.content.as_str()).collect();
    assert_eq!(rest, vec!["q1", "a1", "q2"]);
}

#[test]
fn input_is_trimmed_and_blank_ignored() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Ok("ok".to_owned())]);

    assert!(!block_on(submit(&session, &transport, "   ")));
    assert_eq!(transport.chat_calls.get(), 0);

    block_on(submit(&session, &transport, "  hi  "));
    assert_eq!(session.borrow().thread()[0].text, "hi");
}

#[test]
fn unknown_connectivity_allows_submission() {
    let session = RefCell::new(ChatSession::new());
    let transport = ScriptedTransport::with_replies(vec![Ok("ok".to_owned())]);
    assert!(block_on(submit(&session, &transport, "hi")));
    assert_eq!(session.borrow().connectivity().state(), Connectivity::Online);
}

// =============================================================
// latch
// =============================================================

#[test]
fn overlapping_submits_issue_exactly_one_call() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Ok("first".to_owned()), Ok("second".to_owned())]);

    let (a, b) = block_on(async {
        futures::join!(submit(&session, &transport, "one"), submit(&session, &transport, "two"))
    });

    assert!(a);
    assert!(!b);
    assert_eq!(transport.chat_calls.get(), 1);
    let session = session.borrow();
    assert_eq!(session.conversation().history().len(), 2);
    assert!(session.thread().iter().all(|e| e.text != "two"));
}

#[test]
fn begin_submit_drops_while_processing() {
    let mut session = online_session().into_inner();
    assert!(matches!(session.begin_submit("one"), Submission::Dispatch(_)));
    assert!(session.is_processing());
    assert_eq!(session.begin_submit("two"), Submission::Dropped);
    assert_eq!(session.conversation().history().len(), 1);
}

#[test]
fn latch_released_after_failure() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Err(rate_limited()), Ok("recovered".to_owned())]);

    assert!(block_on(submit(&session, &transport, "one")));
    assert!(!session.borrow().is_processing());
    assert!(block_on(submit(&session, &transport, "two")));
    assert_eq!(transport.chat_calls.get(), 2);
}

// =============================================================
// failures
// =============================================================

#[test]
fn api_failure_shows_message_and_keeps_online() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Err(rate_limited())]);

    block_on(submit(&session, &transport, "hi"));

    let session = session.borrow();
    let last = session.thread().last().unwrap();
    assert_eq!(last.role, ThreadRole::Error);
    assert_eq!(last.text, "Rate limit exceeded. Please try again later.");
    assert!(session.connectivity().is_online());
    // The user turn stays in history; no assistant turn was added.
    assert_eq!(session.conversation().history().len(), 1);
}

#[test]
fn network_failure_flips_offline_and_gates_next_submit() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Err(network_failure())]);

    block_on(submit(&session, &transport, "hi"));
    assert!(session.borrow().connectivity().is_offline());
    assert_eq!(session.borrow().thread().last().unwrap().text, ErrorKind::Network.default_message());

    assert!(!block_on(submit(&session, &transport, "again")));
    assert_eq!(transport.chat_calls.get(), 1);
    let session = session.borrow();
    assert_eq!(session.thread().last().unwrap().text, OFFLINE_ADVISORY);
    assert!(!session.is_processing());
}

#[test]
fn malformed_completion_is_unknown_error() {
    let mut session = online_session().into_inner();
    let _ = session.begin_submit("hi");
    let info = session.finish_submit(Err(RelayFailure::MalformedCompletion)).unwrap();
    assert_eq!(info.kind, ErrorKind::Unknown);
    assert!(session.connectivity().is_online());
}

#[test]
fn offline_probe_rejects_without_network_call() {
    let mut session = ChatSession::new();
    session.apply_health(Ok(offline_report()), 0.0);
    let session = RefCell::new(session);
    let transport = ScriptedTransport::with_replies(vec![Ok("never".to_owned())]);

    assert!(!block_on(submit(&session, &transport, "hi")));
    assert_eq!(transport.chat_calls.get(), 0);
    assert!(session.borrow().conversation().history().is_empty());
}

// =============================================================
// probe / greet / reset
// =============================================================

#[test]
fn probe_records_health() {
    let session = RefCell::new(ChatSession::new());
    let transport = ScriptedTransport::with_health(Ok(offline_report()));
    block_on(probe(&session, &transport, 42.0));

    let session = session.borrow();
    assert!(session.connectivity().is_offline());
    assert_eq!(session.connectivity().last_health().map(|h| h.checked_at), Some(42.0));
}

#[test]
fn probe_failure_uses_canned_message() {
    let session = RefCell::new(ChatSession::new());
    let transport = ScriptedTransport::with_health(Err("TypeError: Failed to fetch".to_owned()));
    block_on(probe(&session, &transport, 1.0));
    assert_eq!(session.borrow().connectivity().notice(), Some(PROBE_FAILURE_MESSAGE));
}

#[test]
fn greet_picks_variant_and_runs_once() {
    let mut online = online_session().into_inner();
    online.greet();
    online.greet();
    assert_eq!(online.thread().len(), 1);
    assert_eq!(online.thread()[0].text, WELCOME_ONLINE);

    let mut offline = ChatSession::new();
    offline.apply_health(Ok(offline_report()), 0.0);
    offline.greet();
    assert_eq!(offline.thread()[0].text, WELCOME_OFFLINE);
}

#[test]
fn greet_does_not_touch_history() {
    let mut session = online_session().into_inner();
    session.greet();
    assert!(session.conversation().history().is_empty());
}

#[test]
fn reset_clears_thread_and_history() {
    let session = online_session();
    let transport = ScriptedTransport::with_replies(vec![Ok("Hello!".to_owned())]);
    block_on(submit(&session, &transport, "hi"));

    session.borrow_mut().reset();
    let session = session.borrow();
    assert!(session.thread().is_empty());
    assert!(session.conversation().history().is_empty());
}

#[test]
fn thread_entry_ids_are_unique() {
    let mut session = online_session().into_inner();
    session.greet();
    let _ = session.begin_submit("hi");
    session.finish_submit(Ok("yo".to_owned()));
    let ids: std::collections::HashSet<_> = session.thread().iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids.len(), 3);
}
