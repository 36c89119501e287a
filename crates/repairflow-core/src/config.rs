//! Client configuration.

use std::time::Duration;

use crate::error::FlowError;
use crate::sender::RetryPolicy;
use crate::Result;

/// Base URL of a locally running analysis service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where and how to reach the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service base URL; endpoints are appended as `<base>/<endpoint>`.
    pub base_url: String,

    pub retry: RetryPolicy,

    /// Per-request timeout. `None` waits as long as the HTTP layer allows.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create config for a specific service
    pub fn new(base_url: &str) -> Self {
        ClientConfig {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(FlowError::InvalidConfig("base URL is empty".to_string()));
        }
        self.retry.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay, Duration::from_secs(2));
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::new("http://analysis:9000")
            .with_retry(RetryPolicy::new(5, Duration::from_millis(10)))
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.base_url, "http://analysis:9000");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_client_config_rejects_empty_base_url() {
        let err = ClientConfig::new("  ").validate().unwrap_err();
        assert!(matches!(err, FlowError::InvalidConfig(_)));
    }
}
