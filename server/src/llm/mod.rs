//! Upstream chat-completion adapter for the assistant widget.
//!
//! DESIGN
//! ======
//! A single OpenAI-compatible provider, configured once at startup from
//! `UpstreamConfig`. The relay route owns error translation; this module only
//! reports what happened on the wire.

pub mod client;
pub mod types;

pub use client::UpstreamClient;
