//! Networking modules for the relay HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls, `types` defines the wire schema, and
//! `classify` maps failed calls onto the widget's error taxonomy.

pub mod api;
pub mod classify;
pub mod types;
