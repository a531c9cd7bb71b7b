//! Runtime configuration parsed once from environment variables.
//!
//! DESIGN
//! ======
//! Handlers never read the process environment. `AppConfig::from_env` runs
//! once in `main` and the resulting value is shared read-only through
//! `AppState`. Parsing goes through `from_lookup` so tests can feed a map
//! instead of mutating process-wide env vars.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_PORT: u16 = 8000;

/// Value shipped in `.env.example`. Treated exactly like an unset key.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Hard bound on a single upstream completion call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

// =============================================================================
// UPSTREAM
// =============================================================================

/// Chat-completion provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    api_key: Option<String>,
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Build provider settings. Blank keys and the placeholder sentinel are
    /// normalized to "not configured".
    #[must_use]
    pub fn new(api_key: Option<String>, url: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY);
        Self { api_key, url: url.into(), model: model.into(), timeout: UPSTREAM_TIMEOUT }
    }

    /// The bearer credential, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// =============================================================================
// MAIL
// =============================================================================

/// Contact-form mail transport settings (Resend).
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
    pub recipient: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .field("recipient", &self.recipient)
            .finish()
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    /// `None` when `RESEND_API_KEY` or `CONTACT_FROM` is missing.
    pub mail: Option<MailConfig>,
    pub port: u16,
    pub website_dir: PathBuf,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DEEPSEEK_API_KEY`: upstream credential (relay reports offline without it)
    /// - `DEEPSEEK_API_URL`: default `https://api.deepseek.com/chat/completions`
    /// - `DEEPSEEK_MODEL`: default `deepseek-chat`
    /// - `PORT`: default 8000
    /// - `WEBSITE_DIR`: static site root, default `../site` next to this crate
    /// - `RESEND_API_KEY`, `CONTACT_FROM`: enable the contact mailer
    /// - `CONTACT_RECIPIENT`: defaults to `CONTACT_FROM`
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let upstream = UpstreamConfig::new(
            get("DEEPSEEK_API_KEY"),
            get("DEEPSEEK_API_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_owned()),
            get("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        );

        let mail = match (get("RESEND_API_KEY"), get("CONTACT_FROM")) {
            (Some(api_key), Some(from)) => {
                let recipient = get("CONTACT_RECIPIENT").unwrap_or_else(|| from.clone());
                Some(MailConfig { api_key, from, recipient })
            }
            _ => None,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw.clone() })?,
            None => DEFAULT_PORT,
        };

        let website_dir = get("WEBSITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../site"));

        Ok(Self { upstream, mail, port, website_dir })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
