//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only read-only collaborators: the configuration loaded at startup,
//! the upstream completion client, and the optional contact mailer. Requests
//! share no mutable state, so no locking is needed.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::UpstreamClient;
use crate::llm::types::UpstreamError;
use crate::services::contact::Mailer;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: UpstreamClient,
    /// Optional contact mailer. `None` if mail env vars are not configured.
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: AppConfig, mailer: Option<Arc<dyn Mailer>>) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self { config: Arc::new(config), upstream, mailer })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
