//! Typed views over the service's response documents.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::bug::BugDetail;
use crate::error::FlowError;
use crate::stage::Stage;
use crate::Result;

/// Report status that marks a validated repair.
pub const VALIDATION_SUCCESS: &str = "Validation Success";

#[derive(Deserialize)]
struct AiRepairSummary {
    status: String,
}

fn parse<T: serde::de::DeserializeOwned>(stage: Stage, document: &Value) -> Result<T> {
    serde_json::from_value(document.clone()).map_err(|e| FlowError::malformed(stage, e.to_string()))
}

/// Response of `POST /full-analysis`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The document exactly as received.
    pub document: Value,

    /// `result.metadata.klee_output_dir`
    pub output_dir: String,

    /// Typed view of `result.bugs`, index-aligned with the document.
    ///
    /// `None` marks an entry that did not decode; it is still forwarded raw.
    pub bugs: Vec<Option<BugDetail>>,
}

impl AnalysisResult {
    /// Only `result.metadata.klee_output_dir` and an array `result.bugs` are
    /// required. Individual bug records are decoded best-effort.
    pub fn from_document(document: Value) -> Result<Self> {
        #[derive(Deserialize)]
        struct Envelope {
            result: Body,
        }

        #[derive(Deserialize)]
        struct Body {
            metadata: Metadata,
            bugs: Vec<Value>,
        }

        #[derive(Deserialize)]
        struct Metadata {
            klee_output_dir: String,
        }

        let envelope: Envelope = parse(Stage::Analysis, &document)?;
        let bugs = envelope
            .result
            .bugs
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| decode_bug(idx, raw))
            .collect();

        Ok(Self {
            output_dir: envelope.result.metadata.klee_output_dir,
            bugs,
            document,
        })
    }

    /// Whether the analysis reported any defect.
    pub fn has_findings(&self) -> bool {
        !self.bugs.is_empty()
    }

    /// Typed view of `result.bugs[0]`, if it decoded.
    pub fn first_bug(&self) -> Option<&BugDetail> {
        self.bugs.first().and_then(Option::as_ref)
    }

    /// `result.bugs[0]` as the service sent it.
    pub fn first_bug_document(&self) -> Option<&Value> {
        self.document.pointer("/result/bugs/0")
    }
}

fn decode_bug(idx: usize, raw: Value) -> Option<BugDetail> {
    match serde_json::from_value::<BugDetail>(raw) {
        Ok(bug) if bug.line >= 1 => Some(bug),
        Ok(bug) => {
            warn!(index = idx, line = bug.line, "Bug record has no valid line number");
            None
        }
        Err(e) => {
            warn!(index = idx, error = %e, "Bug record did not decode");
            None
        }
    }
}

/// Response of `POST /repair`.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairResult {
    pub document: Value,
    pub validation_status: String,

    /// `ai_repair_summary.status`, when the service already includes it.
    pub summary_status: Option<String>,
}

impl RepairResult {
    pub fn from_document(document: Value) -> Result<Self> {
        #[derive(Deserialize)]
        struct Body {
            validation_status: String,
            #[serde(default)]
            ai_repair_summary: Option<AiRepairSummary>,
        }

        let body: Body = parse(Stage::Repair, &document)?;
        Ok(Self {
            validation_status: body.validation_status,
            summary_status: body.ai_repair_summary.map(|s| s.status),
            document,
        })
    }
}

/// Response of `POST /report`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    pub document: Value,

    /// `ai_repair_summary.status`
    pub status: String,
}

impl FinalReport {
    pub fn from_document(document: Value) -> Result<Self> {
        #[derive(Deserialize)]
        struct Body {
            ai_repair_summary: AiRepairSummary,
        }

        let body: Body =
            parse(Stage::Report, &document).map_err(|e| e.with_received(document.clone()))?;
        Ok(Self {
            status: body.ai_repair_summary.status,
            document,
        })
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_status(&self.status)
    }
}

/// Final pass/fail determination of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The report says `Validation Success`.
    Verified,

    /// Any other report status.
    ValidationFailed { status: String },
}

impl Verdict {
    pub fn from_status(status: &str) -> Self {
        if status == VALIDATION_SUCCESS {
            Verdict::Verified
        } else {
            Verdict::ValidationFailed {
                status: status.to_string(),
            }
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Verdict::Verified)
    }
}
