//! In-memory fakes for the transport and sleeper seams (testing only)
//!
//! `ScriptedTransport` answers each endpoint from a queue of scripted
//! responses and records every request. `RecordingSleeper` records requested
//! delays and returns immediately.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::sender::Sleeper;
use crate::transport::{Transport, TransportError};

type Scripted = std::result::Result<Value, TransportError>;

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub body: Value,
}

impl RecordedCall {
    /// Last path segment of the URL.
    pub fn endpoint(&self) -> &str {
        endpoint_of(&self.url)
    }
}

fn endpoint_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

// ---------------------------------------------------------------------------
// ScriptedTransport
// ---------------------------------------------------------------------------

/// Transport that replays queued responses per endpoint.
///
/// An endpoint with an empty queue answers with a network error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response for `endpoint`.
    pub fn respond(&self, endpoint: &str, body: Value) {
        self.push(endpoint, Ok(body));
    }

    /// Queue a failed attempt for `endpoint`.
    pub fn fail(&self, endpoint: &str, error: TransportError) {
        self.push(endpoint, Err(error));
    }

    fn push(&self, endpoint: &str, response: Scripted) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every request in the order it was sent.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Requests sent to one endpoint.
    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint() == endpoint)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Scripted {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            body: body.clone(),
        });

        let mut responses = self.responses.lock().unwrap();
        responses
            .get_mut(endpoint_of(url))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(TransportError::Network(format!(
                    "no scripted response for {}",
                    url
                )))
            })
    }
}

// ---------------------------------------------------------------------------
// RecordingSleeper
// ---------------------------------------------------------------------------

/// Sleeper that records durations instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
