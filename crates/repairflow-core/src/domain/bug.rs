//! Defect records produced by the analysis stage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity assigned by the analysis service.
///
/// Unknown labels are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Low" => Severity::Low,
            "Medium" => Severity::Medium,
            "High" => Severity::High,
            "Critical" => Severity::Critical,
            _ => Severity::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single defect found by the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugDetail {
    /// Defect kind, e.g. "divide by zero".
    #[serde(rename = "type")]
    pub kind: String,

    /// 1-based source line.
    pub line: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub severity: Severity,

    /// Symbolic-execution path that triggered the defect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_id: Option<i64>,

    /// Service-assigned identifiers (e.g. `err_file`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
