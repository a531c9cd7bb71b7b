//! Relay connectivity as seen by the widget.
//!
//! DESIGN
//! ======
//! State starts `Unknown` and moves only on two signals: an explicit health
//! probe, or the outcome of a relay call. A successful completion forces
//! `Online`; a `network`-classified failure forces `Offline`. API, timeout and
//! unknown failures leave the state alone. There is no background polling.

#[cfg(test)]
#[path = "connectivity_test.rs"]
mod connectivity_test;

use crate::net::types::{ErrorInfo, ErrorKind, HealthReport};

/// Shown when the health probe itself cannot reach the server.
pub const PROBE_FAILURE_MESSAGE: &str = "Unable to connect to server. Please make sure the server is running.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Result of the most recent health probe.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthStatus {
    pub online: bool,
    pub model: Option<String>,
    pub message: Option<String>,
    /// Milliseconds since the epoch at which the probe completed.
    pub checked_at: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectivityMonitor {
    state: Connectivity,
    last_health: Option<HealthStatus>,
    notice: Option<String>,
}

impl ConnectivityMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a probe result. The reported status is taken as-is.
    pub fn apply_probe(&mut self, report: Result<HealthReport, String>, now_ms: f64) -> &HealthStatus {
        let health = match report {
            Ok(report) => HealthStatus {
                online: report.is_online(),
                model: report.model,
                message: report.message,
                checked_at: now_ms,
            },
            Err(_) => HealthStatus {
                online: false,
                model: None,
                message: Some(PROBE_FAILURE_MESSAGE.to_owned()),
                checked_at: now_ms,
            },
        };
        if health.online {
            self.state = Connectivity::Online;
            self.notice = None;
        } else {
            self.state = Connectivity::Offline;
            self.notice.clone_from(&health.message);
        }
        self.last_health.insert(health)
    }

    pub fn record_success(&mut self) {
        self.state = Connectivity::Online;
        self.notice = None;
    }

    /// Only `network` failures are connectivity signals.
    pub fn record_failure(&mut self, info: &ErrorInfo) {
        if info.kind == ErrorKind::Network {
            self.state = Connectivity::Offline;
            self.notice = Some(info.message.clone());
        }
    }

    #[must_use]
    pub fn state(&self) -> Connectivity {
        self.state
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state == Connectivity::Online
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.state == Connectivity::Offline
    }

    #[must_use]
    pub fn last_health(&self) -> Option<&HealthStatus> {
        self.last_health.as_ref()
    }

    /// Banner text explaining the current offline state, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

#[must_use]
pub fn status_label(state: Connectivity) -> &'static str {
    match state {
        Connectivity::Online => "Online",
        Connectivity::Offline => "Offline",
        Connectivity::Unknown => "Connecting...",
    }
}

#[must_use]
pub fn input_placeholder(state: Connectivity) -> &'static str {
    if state == Connectivity::Offline { "Chat unavailable - service offline" } else { "Ask a question..." }
}
