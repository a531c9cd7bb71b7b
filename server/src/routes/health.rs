//! Readiness probe for the assistant widget.
//!
//! Reports only whether a credential is configured. It does not contact the
//! provider, so "online" means "ready to try", not "provider reachable".

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::config::UpstreamConfig;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Online,
    Offline,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pure function of configuration.
#[must_use]
pub fn health_report(upstream: &UpstreamConfig) -> HealthResponse {
    if upstream.is_configured() {
        HealthResponse { status: HealthState::Online, model: Some(upstream.model.clone()), message: None }
    } else {
        HealthResponse {
            status: HealthState::Offline,
            model: None,
            message: Some("DeepSeek API key not configured.".to_owned()),
        }
    }
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_report(&state.config.upstream))
}

#[cfg(test)]
#[path = "health_test.rs"]
mod tests;
