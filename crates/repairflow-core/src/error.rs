//! Error types for repairflow-core

use serde_json::Value;
use thiserror::Error;

use crate::stage::Stage;

/// Errors that can abort a repairflow run
#[derive(Error, Debug)]
pub enum FlowError {
    /// Every delivery attempt to the service failed
    #[error("Failed to connect to {url} after {attempts} attempts. Last error: {last_error}")]
    Connection {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// The service answered, but not with the document this stage expects
    #[error("Malformed {stage} response: {detail}{}", received_suffix(.received))]
    MalformedResponse {
        stage: Stage,
        detail: String,
        /// The offending document, when it is worth showing the operator.
        received: Option<Value>,
    },

    /// Client configuration rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction error
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    pub(crate) fn malformed(stage: Stage, detail: impl Into<String>) -> Self {
        FlowError::MalformedResponse {
            stage,
            detail: detail.into(),
            received: None,
        }
    }

    /// Attach the received document to a malformed-response error.
    pub(crate) fn with_received(self, document: Value) -> Self {
        match self {
            FlowError::MalformedResponse { stage, detail, .. } => FlowError::MalformedResponse {
                stage,
                detail,
                received: Some(document),
            },
            other => other,
        }
    }
}

fn received_suffix(received: &Option<Value>) -> String {
    match received {
        Some(document) => format!(
            "\nReceived document:\n{}",
            serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
        ),
        None => String::new(),
    }
}

impl From<reqwest::Error> for FlowError {
    fn from(err: reqwest::Error) -> Self {
        FlowError::Http(err.to_string())
    }
}
