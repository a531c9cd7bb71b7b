//! Contact-form route.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::json;

use crate::error::{ApiError, ErrorCode};
use crate::services::contact::{self as contact_svc, ContactError, ContactRequest};
use crate::state::AppState;

/// `POST /api/contact`: validate the form and mail it to the site owner.
///
/// # Errors
///
/// 400 on missing fields or a malformed email, 500 when the mailer is not
/// configured or delivery fails.
pub async fn contact(State(state): State<AppState>, body: Bytes) -> Result<Json<serde_json::Value>, ApiError> {
    let request: ContactRequest = serde_json::from_slice(&body).unwrap_or_default();
    let submission = contact_svc::validate(request)?;

    let Some(mailer) = &state.mailer else {
        tracing::error!("contact mailer not configured (RESEND_API_KEY / CONTACT_FROM)");
        return Err(ContactError::NotConfigured.into());
    };

    let email = contact_svc::render_contact_email(&submission);
    if let Err(e) = mailer.send(&email).await {
        tracing::error!(code = e.error_code(), error = %e, "contact email failed");
        return Err(e.into());
    }

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully! I'll get back to you soon.",
    })))
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
