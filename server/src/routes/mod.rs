//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the assistant widget's JSON API and the contact form under a single
//! Axum router. The public portfolio site (including the widget's WASM
//! bundle) is served as static files for every other path.

pub mod chat;
pub mod contact;
pub mod health;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application: API routes plus the static site fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website_service = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/chat", post(chat::chat))
        .route("/api/contact", post(contact::contact))
        .fallback_service(website_service)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
