//! Three-stage workflow: analysis, repair, report, then verdict.
//!
//! Stages run strictly in order and each stage's output is fully decoded
//! before the next request is built. A failed stage aborts the run; earlier
//! results are discarded.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    AnalysisRequest, AnalysisResult, FinalReport, RepairRequest, RepairResult, ReportRequest,
    Verdict,
};
use crate::error::FlowError;
use crate::sender::ResilientSender;
use crate::stage::Stage;
use crate::Result;

/// Timing and retry accounting for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: Stage,

    /// Delivery attempts used (1 = first try).
    pub attempts: u32,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// Analysis returned no bugs; repair and report were skipped.
    NoFindings { analysis: AnalysisResult },

    /// All three stages ran.
    Completed {
        analysis: AnalysisResult,
        repair: RepairResult,
        report: FinalReport,
        verdict: Verdict,
    },
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    /// SHA-256 of the submitted source.
    pub source_digest: String,

    /// Executed stages, in order.
    pub stages: Vec<StageRecord>,

    pub outcome: WorkflowOutcome,
}

impl WorkflowRun {
    /// `None` when the run stopped at NoFindings.
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.outcome {
            WorkflowOutcome::NoFindings { .. } => None,
            WorkflowOutcome::Completed { verdict, .. } => Some(verdict),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verdict().is_some_and(Verdict::is_verified)
    }

    pub fn total_attempts(&self) -> u32 {
        self.stages.iter().map(|s| s.attempts).sum()
    }

    pub fn duration_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_ms).sum()
    }
}

/// Drives the analysis service through one run.
pub struct WorkflowRunner {
    sender: ResilientSender,
}

impl WorkflowRunner {
    pub fn new(sender: ResilientSender) -> Self {
        Self { sender }
    }

    async fn call<P: Serialize>(&self, stage: Stage, payload: &P) -> Result<(Value, StageRecord)> {
        info!(stage = %stage, "--- STEP {}: {} ---", stage.step(), stage.title());
        let start = Instant::now();

        let delivery = self.sender.post(stage.endpoint(), payload).await?;

        let record = StageRecord {
            stage,
            attempts: delivery.attempts,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        Ok((delivery.body, record))
    }

    /// Stage 1 only: submit the source and decode the findings.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<(AnalysisResult, StageRecord)> {
        let (document, record) = self.call(Stage::Analysis, request).await?;
        let analysis = AnalysisResult::from_document(document)?;

        info!(
            output_dir = %analysis.output_dir,
            bugs = analysis.bugs.len(),
            "Analysis completed. Output dir: {}",
            analysis.output_dir
        );
        Ok((analysis, record))
    }

    /// Run analysis, repair and report, and derive the verdict.
    ///
    /// The repair request carries the analysis document's own `result.bugs[0]`.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<WorkflowRun> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let source_digest = request.source_digest();
        let short_digest = &source_digest[..12];

        info!(
            run_id = %run_id,
            filename = %request.filename,
            source_digest = %short_digest,
            "Starting repairflow run"
        );

        let mut stages = Vec::with_capacity(Stage::ALL.len());

        let (analysis, record) = self.analyze(request).await?;
        stages.push(record);

        if !analysis.has_findings() {
            warn!(run_id = %run_id, "Analysis found no bugs. Skipping repair and report");
            return Ok(WorkflowRun {
                run_id,
                started_at,
                source_digest,
                stages,
                outcome: WorkflowOutcome::NoFindings { analysis },
            });
        }

        match analysis.first_bug() {
            Some(selected) => info!(
                kind = %selected.kind,
                line = selected.line,
                severity = %selected.severity,
                "Selected defect for repair"
            ),
            None => warn!("result.bugs[0] did not decode; forwarding it as received"),
        }
        let bug_details = analysis
            .first_bug_document()
            .ok_or_else(|| FlowError::malformed(Stage::Analysis, "result.bugs[0] is missing"))?;

        let repair_request = RepairRequest {
            original_code: &request.code,
            bug_details,
            original_filename: &request.filename,
        };
        let (document, record) = self.call(Stage::Repair, &repair_request).await?;
        stages.push(record);
        let repair = RepairResult::from_document(document)?;
        info!(
            validation_status = %repair.validation_status,
            "Repair completed. Validation status: {}",
            repair.validation_status
        );

        let report_request = ReportRequest {
            initial_analysis: &analysis.document,
            repair_results: &repair.document,
            original_code: &request.code,
        };
        let (document, record) = self.call(Stage::Report, &report_request).await?;
        stages.push(record);
        let report = FinalReport::from_document(document).inspect_err(|e| {
            warn!(run_id = %run_id, error = %e, "Report response is malformed");
        })?;

        let verdict = report.verdict();
        match &verdict {
            Verdict::Verified => info!(run_id = %run_id, "Repair verified"),
            Verdict::ValidationFailed { status } => {
                warn!(run_id = %run_id, status = %status, "Repair validation did not pass")
            }
        }

        Ok(WorkflowRun {
            run_id,
            started_at,
            source_digest,
            stages,
            outcome: WorkflowOutcome::Completed {
                analysis,
                repair,
                report,
                verdict,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{RecordingSleeper, ScriptedTransport};
    use crate::sender::RetryPolicy;
    use crate::transport::TransportError;
    use serde_json::json;
    use std::sync::Arc;

    fn runner(transport: Arc<ScriptedTransport>) -> WorkflowRunner {
        let sender = ResilientSender::new(
            "http://localhost:8000",
            RetryPolicy::default(),
            transport,
            Arc::new(RecordingSleeper::new()),
        )
        .unwrap();
        WorkflowRunner::new(sender)
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("buggy_div.c", "int main() { return 1/0; }")
    }

    #[test]
    fn test_workflow_run_accounting() {
        let analysis = AnalysisResult::from_document(json!({
            "result": {"metadata": {"klee_output_dir": "/out"}, "bugs": []}
        }))
        .unwrap();
        let run = WorkflowRun {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source_digest: "d".repeat(64),
            stages: vec![
                StageRecord {
                    stage: Stage::Analysis,
                    attempts: 3,
                    duration_ms: 40,
                },
                StageRecord {
                    stage: Stage::Repair,
                    attempts: 1,
                    duration_ms: 2,
                },
            ],
            outcome: WorkflowOutcome::NoFindings { analysis },
        };

        assert_eq!(run.total_attempts(), 4);
        assert_eq!(run.duration_ms(), 42);
        assert!(run.verdict().is_none());
        assert!(!run.is_verified());
    }

    #[tokio::test]
    async fn test_analyze_only_calls_full_analysis() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "full-analysis",
            json!({"result": {"metadata": {"klee_output_dir": "/out"}, "bugs": []}}),
        );

        let (analysis, record) = runner(transport.clone()).analyze(&request()).await.unwrap();

        assert_eq!(analysis.output_dir, "/out");
        assert_eq!(record.stage, Stage::Analysis);
        assert_eq!(record.attempts, 1);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            json!({"filename": "buggy_div.c", "code": "int main() { return 1/0; }"})
        );
    }

    #[tokio::test]
    async fn test_repair_failure_aborts_run() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "full-analysis",
            json!({"result": {"metadata": {"klee_output_dir": "/out"}, "bugs": [
                {"type": "divide by zero", "line": 1, "severity": "High", "path_id": 1}
            ]}}),
        );
        for _ in 0..3 {
            transport.fail(
                "repair",
                TransportError::Status {
                    code: 503,
                    body: "busy".to_string(),
                },
            );
        }

        let err = runner(transport.clone()).run(&request()).await.unwrap_err();

        assert!(matches!(err, FlowError::Connection { attempts: 3, .. }));
        assert!(transport.calls_to("report").is_empty());
    }

    #[tokio::test]
    async fn test_malformed_repair_response_aborts_run() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "full-analysis",
            json!({"result": {"metadata": {"klee_output_dir": "/out"}, "bugs": [
                {"type": "divide by zero", "line": 1, "severity": "High"}
            ]}}),
        );
        transport.respond("repair", json!({"status": "ok"}));

        let err = runner(transport.clone()).run(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::MalformedResponse {
                stage: Stage::Repair,
                ..
            }
        ));
        assert!(transport.calls_to("report").is_empty());
    }
}
