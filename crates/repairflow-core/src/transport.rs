//! HTTP transport seam.
//!
//! [`Transport`] is the single point where bytes leave the process. The
//! production implementation is [`HttpTransport`] (reqwest); tests use
//! [`crate::fakes::ScriptedTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use thiserror::Error;

use crate::Result;

/// Longest response body excerpt kept in a status error.
const MAX_ERROR_BODY: usize = 512;

/// Failure of a single delivery attempt. Every kind is retried by the sender.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, reset
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// 2xx response whose body is not JSON
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

/// POSTs a JSON body and returns the decoded JSON response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> std::result::Result<Value, TransportError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client. `timeout` bounds each request; `None` keeps reqwest's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("repairflow/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpTransport {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> std::result::Result<Value, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let status = TransportError::Status {
            code: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(status.to_string(), "HTTP 500: Internal Server Error");
        assert!(TransportError::Decode("eof".to_string())
            .to_string()
            .contains("not valid JSON"));
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééé", 3), "é...");
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(None).is_ok());
        assert!(HttpTransport::new(Some(Duration::from_secs(5))).is_ok());
    }
}
