//! Resilient JSON POST sender with a fixed-count, fixed-delay retry policy.
//!
//! Network failures, non-2xx statuses and undecodable bodies are all retried
//! the same way: no backoff, no jitter, no status-code classification.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::FlowError;
use crate::transport::{HttpTransport, Transport};
use crate::Result;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How many times a request is attempted and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Fixed wait between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(FlowError::InvalidConfig(
                "retry policy needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sleeper
// ---------------------------------------------------------------------------

/// Source of retry delays, injected so tests never wait on a real clock.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

/// A successful delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Decoded JSON response body.
    pub body: Value,

    /// Attempts used, 1 when the first try succeeded.
    pub attempts: u32,
}

/// POSTs JSON payloads to `<base_url>/<endpoint>`, retrying transient failures.
pub struct ResilientSender {
    base_url: String,
    policy: RetryPolicy,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl ResilientSender {
    pub fn new(
        base_url: &str,
        policy: RetryPolicy,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            transport,
            sleeper,
        })
    }

    /// Production sender: reqwest transport and tokio sleeps.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.request_timeout)?;
        Self::new(
            &config.base_url,
            config.retry,
            Arc::new(transport),
            Arc::new(TokioSleeper),
        )
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Send `payload` as JSON and return the decoded response.
    ///
    /// Fails with [`FlowError::Connection`] once the attempt budget is spent.
    /// No response schema is checked here.
    pub async fn post<P>(&self, endpoint: &str, payload: &P) -> Result<Delivery>
    where
        P: Serialize + ?Sized,
    {
        let url = self.url_for(endpoint);
        let body = serde_json::to_value(payload)?;
        let max_attempts = self.policy.max_attempts;

        info!(url = %url, "Calling {}", url);

        let mut last_error = String::new();
        for attempt in 1..=max_attempts {
            info!(url = %url, attempt, max_attempts, "Attempt {}/{}", attempt, max_attempts);

            match self.transport.post_json(&url, &body).await {
                Ok(response) => {
                    if attempt > 1 {
                        info!(url = %url, attempt, "Request succeeded after retry");
                    }
                    return Ok(Delivery {
                        body: response,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        warn!(
                            url = %url,
                            attempt,
                            error = %e,
                            "Attempt {} failed: {}. Retrying in {:?}...",
                            attempt,
                            e,
                            self.policy.delay
                        );
                        self.sleeper.sleep(self.policy.delay).await;
                    } else {
                        warn!(url = %url, attempt, error = %e, "Attempt {} failed: {}", attempt, e);
                    }
                }
            }
        }

        Err(FlowError::Connection {
            url,
            attempts: max_attempts,
            last_error,
        })
    }
}
