//! Contact-form mail service.
//!
//! Validates a visitor's submission, renders the notification email, and
//! hands it to a [`Mailer`]. Production uses Resend; tests inject a
//! recording mailer.

use axum::http::StatusCode;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use serde::Deserialize;

use crate::config::MailConfig;
use crate::error::{ErrorCode, ErrorKind};

const CONTACT_TEMPLATE: &str = include_str!("../../templates/contact_email.html");

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("missing required contact fields")]
    MissingFields,
    #[error("invalid email")]
    InvalidEmail,
    #[error("mailer not configured")]
    NotConfigured,
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

impl ContactError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields | Self::InvalidEmail => ErrorKind::Validation,
            Self::NotConfigured => ErrorKind::Configuration,
            Self::Delivery(_) => ErrorKind::Server,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::InvalidEmail => "Invalid email format",
            Self::NotConfigured => "Email service not configured",
            Self::Delivery(_) => "Email sending failed",
        }
    }

    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Please fill in all fields: name, email, subject, and message",
            Self::InvalidEmail => "Please provide a valid email address",
            Self::NotConfigured => "Contact form is currently unavailable. Please try again later.",
            Self::Delivery(_) => "Failed to send message. Please try again later.",
        }
    }
}

impl ErrorCode for ContactError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields => "E_MISSING_FIELDS",
            Self::InvalidEmail => "E_INVALID_EMAIL",
            Self::NotConfigured => "E_MAILER_NOT_CONFIGURED",
            Self::Delivery(_) => "E_EMAIL_DELIVERY",
        }
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Raw form body. Every field is optional so a partial form reports
/// `MissingFields` instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation. All fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Notification email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Check presence of every field, then email shape.
///
/// # Errors
///
/// [`ContactError::MissingFields`] or [`ContactError::InvalidEmail`].
pub fn validate(request: ContactRequest) -> Result<ContactSubmission, ContactError> {
    let field = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
    let (Some(name), Some(email), Some(subject), Some(message)) =
        (field(request.name), field(request.email), field(request.subject), field(request.message))
    else {
        return Err(ContactError::MissingFields);
    };
    if !is_valid_email(&email) {
        return Err(ContactError::InvalidEmail);
    }
    Ok(ContactSubmission { name, email, subject, message })
}

/// `local@domain.tld`: exactly one `@`, no whitespace, and a dot inside the
/// domain with characters on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[must_use]
pub fn render_contact_email(submission: &ContactSubmission) -> ContactEmail {
    let message_html = escape_html(&submission.message).replace('\n', "<br>");
    let html = fill_template(
        CONTACT_TEMPLATE,
        &[
            ("NAME", escape_html(&submission.name).as_str()),
            ("EMAIL", escape_html(&submission.email).as_str()),
            ("SUBJECT", escape_html(&submission.subject).as_str()),
            ("MESSAGE", message_html.as_str()),
        ],
    );
    let text = format!(
        "New contact form submission:\n\nFrom: {} ({})\nSubject: {}\n\nMessage:\n{}",
        submission.name, submission.email, submission.subject, submission.message
    );
    ContactEmail {
        reply_to: submission.email.clone(),
        subject: format!("Portfolio Contact: {}", submission.subject),
        html,
        text,
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Single-pass `{{KEY}}` substitution, so values containing placeholders are
/// never expanded a second time.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

// =============================================================================
// MAILER
// =============================================================================

/// Mail transport seam. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email` to the site owner.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Delivery`] if the transport rejects the message.
    async fn send(&self, email: &ContactEmail) -> Result<(), ContactError>;
}

pub struct ResendMailer {
    resend: Resend,
    from: String,
    recipient: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self { resend: Resend::new(&config.api_key), from: config.from, recipient: config.recipient }
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &ContactEmail) -> Result<(), ContactError> {
        let to = [self.recipient.as_str()];
        let options = CreateEmailBaseOptions::new(&self.from, to, &email.subject)
            .with_html(&email.html)
            .with_text(&email.text)
            .with_reply(&email.reply_to);
        let sent = self
            .resend
            .emails
            .send(options)
            .await
            .map_err(|e| ContactError::Delivery(e.to_string()))?;
        tracing::info!(email_id = ?sent.id, "contact email sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
