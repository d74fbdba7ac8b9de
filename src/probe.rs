//! Probe executor: one outbound liveness check per service

use crate::config::Config;
use crate::errors::{PingerError, Result};
use crate::status::ServiceStatus;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Outcome of a single probe, reduced to what the history keeps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: ServiceStatus,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<u64>,
}

impl ProbeOutcome {
    /// Outcome for a received response. 2xx and 3xx count as up.
    pub fn from_response(status_code: u16, elapsed: Duration) -> Self {
        let status = if (200..400).contains(&status_code) {
            ServiceStatus::Up
        } else {
            ServiceStatus::Down
        };

        Self {
            status,
            status_code: Some(status_code),
            response_time_ms: Some(elapsed.as_millis() as u64),
        }
    }

    /// Outcome for a transport error, timeout or abort.
    pub fn failed() -> Self {
        Self {
            status: ServiceStatus::Down,
            status_code: None,
            response_time_ms: None,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

/// Something that can issue a GET and report the final status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_status(&self, url: &str, timeout: Duration) -> Result<u16>;
}

/// reqwest-backed transport that follows redirects.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(PingerError::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_status(&self, url: &str, timeout: Duration) -> Result<u16> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Probe `url` once. Never fails: every error becomes a down outcome, and the
/// outcome resolves no later than `deadline` after dispatch.
pub async fn probe(transport: &dyn Transport, url: &str, deadline: Duration) -> ProbeOutcome {
    let deadline = deadline.max(Duration::from_millis(1));
    let start = Instant::now();

    match timeout(deadline, transport.get_status(url, deadline)).await {
        Ok(Ok(status_code)) => {
            let outcome = ProbeOutcome::from_response(status_code, start.elapsed());
            debug!(
                "Probe {} returned {} in {}ms",
                url,
                status_code,
                outcome.response_time_ms.unwrap_or_default()
            );
            outcome
        }
        Ok(Err(e)) => {
            debug!("Probe {} failed: {}", url, e);
            ProbeOutcome::failed()
        }
        Err(_) => {
            debug!("Probe {} timed out after {}ms", url, deadline.as_millis());
            ProbeOutcome::failed()
        }
    }
}
