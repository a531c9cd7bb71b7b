//! Client-side state for one widget session.

pub mod chat;
pub mod connectivity;
pub mod conversation;
