//! Bounded conversation context for the assistant widget.
//!
//! DESIGN
//! ======
//! History holds only user/assistant turns, capped at [`MAX_HISTORY`] with
//! the oldest evicted first. The system prompt is never stored: it is
//! prepended fresh on every [`Conversation::build_payload`] call so each
//! outbound payload carries exactly one system message, always first.

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use std::collections::VecDeque;

/// Maximum user/assistant turns kept in the context window.
pub const MAX_HISTORY: usize = 10;

/// Default assistant persona for the portfolio site.
pub const SYSTEM_PROMPT: &str = "You are the AI assistant on this portfolio website. \
You answer visitors' questions about the site owner: their skills, education, \
projects, experience, and how to get in touch.

Rules:
1. Always respond in English.
2. You are the assistant, never the site owner. Do not speak as them.
3. Keep answers short: 2-4 sentences for simple questions.
4. No emojis unless the visitor uses them first.
5. No markdown headers. Use plain text or simple bullet points.
6. Be conversational, not formal.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn as sent to the relay.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Per-session conversation state. Created by the widget, never global.
#[derive(Clone, Debug)]
pub struct Conversation {
    system: Message,
    history: VecDeque<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::with_system_prompt(SYSTEM_PROMPT)
    }

    #[must_use]
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self { system: Message::new(Role::System, prompt), history: VecDeque::with_capacity(MAX_HISTORY + 1) }
    }

    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.push(Message::new(Role::User, text));
    }

    pub fn append_assistant_message(&mut self, text: impl Into<String>) {
        self.push(Message::new(Role::Assistant, text));
    }

    /// `[system, ...history]` as a fresh vector. History is left untouched.
    #[must_use]
    pub fn build_payload(&self) -> Vec<Message> {
        let mut payload = Vec::with_capacity(self.history.len() + 1);
        payload.push(self.system.clone());
        payload.extend(self.history.iter().cloned());
        payload
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    #[must_use]
    pub fn history(&self) -> &VecDeque<Message> {
        &self.history
    }

    #[must_use]
    pub fn system_message(&self) -> &Message {
        &self.system
    }

    fn push(&mut self, message: Message) {
        self.history.push_back(message);
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }
}
