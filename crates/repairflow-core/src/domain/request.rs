//! Request bodies for the three service endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Body of `POST /full-analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub filename: String,
    pub code: String,
}

impl AnalysisRequest {
    pub fn new(filename: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            code: code.into(),
        }
    }

    /// SHA-256 hex digest of the submitted source.
    pub fn source_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.code.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Body of `POST /repair`.
///
/// `bug_details` is the analysis document's own `result.bugs[0]`, never a
/// locally built record.
#[derive(Debug, Serialize)]
pub struct RepairRequest<'a> {
    pub original_code: &'a str,
    pub bug_details: &'a Value,
    pub original_filename: &'a str,
}

/// Body of `POST /report`.
#[derive(Debug, Serialize)]
pub struct ReportRequest<'a> {
    pub initial_analysis: &'a Value,
    pub repair_results: &'a Value,
    pub original_code: &'a str,
}
