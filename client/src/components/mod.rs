//! UI components for the assistant widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! `chat_widget` renders the floating chat window from a per-page
//! `ChatSession`; `markdown` turns assistant replies into sanitized HTML.

pub mod chat_widget;
pub mod markdown;
