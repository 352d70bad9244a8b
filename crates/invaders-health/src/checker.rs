//! Reachability probe logic.
//!
//! One GET per probe with a hard timeout. Failures never escape as errors;
//! they are logged and reported as [`MonitorState::Down`].

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{MonitorError, MonitorResult};
use crate::monitor::MonitorState;

/// Classify an HTTP status code.
///
/// `[200, 500)` is `Up`, anything else is `Down`. 4xx counts as up: the
/// server answered, which is all this check asks.
pub fn classify(status: u16) -> MonitorState {
    if (200..500).contains(&status) {
        MonitorState::Up
    } else {
        MonitorState::Down
    }
}

/// Issues reachability probes against monitored URLs.
///
/// TLS certificates are accepted without verification so self-signed
/// targets can be monitored.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Build a prober whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> MonitorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("invaders-health/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MonitorError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `url` once.
    pub async fn probe(&self, url: &str) -> MonitorState {
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let state = classify(status);
                if state == MonitorState::Down {
                    debug!(%url, status, "probe got server error");
                }
                state
            }
            Err(e) if e.is_timeout() => {
                warn!(%url, timeout = ?self.timeout, "probe timed out");
                MonitorState::Down
            }
            Err(e) => {
                warn!(%url, error = %e, "probe failed");
                MonitorState::Down
            }
        }
    }
}
