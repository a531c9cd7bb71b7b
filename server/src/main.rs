mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::services::contact::{Mailer, ResendMailer};

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    if config.upstream.is_configured() {
        tracing::info!(model = %config.upstream.model, url = %config.upstream.url, "chat relay configured");
    } else {
        tracing::warn!("DEEPSEEK_API_KEY not configured; chat relay will report offline");
    }

    // Contact mailer is optional: the form answers 500 without it.
    let mailer = match config.mail.clone() {
        Some(mail) => {
            tracing::info!(recipient = %mail.recipient, "contact mailer initialized");
            Some(Arc::new(ResendMailer::new(mail)) as Arc<dyn Mailer>)
        }
        None => {
            tracing::warn!("RESEND_API_KEY / CONTACT_FROM not set; contact form disabled");
            None
        }
    };

    let port = config.port;
    let state = state::AppState::new(config, mailer).expect("http client init failed");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "portfolio server listening");
    axum::serve(listener, app).await.expect("server failed");
}
