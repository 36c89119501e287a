//! Operator-facing console output.
//!
//! The workflow itself only logs; everything a person reads at the end of a
//! run is produced here so the binary and tests share one rendering.

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::{AnalysisResult, FinalReport, Verdict};
use crate::error::FlowError;
use crate::workflow::{WorkflowOutcome, WorkflowRun};
use crate::Result;

const RULE: &str = "=============================================";
const REPORT_TITLE: &str = "FINAL CONSOLIDATED REPORT";

pub const VERIFIED_LINE: &str = "[VERIFIED] Full end-to-end flow is confirmed working.";
pub const NO_FINDINGS_LINE: &str =
    "[NO FINDINGS] Analysis found no bugs. Cannot proceed with repair test.";

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Final summary of a run: the consolidated report and the verdict line.
pub fn render_outcome(run: &WorkflowRun) -> String {
    let mut out = String::new();

    match &run.outcome {
        WorkflowOutcome::NoFindings { analysis } => {
            let _ = writeln!(out, "Output dir: {}", analysis.output_dir);
            let _ = writeln!(out, "{}", NO_FINDINGS_LINE);
        }
        WorkflowOutcome::Completed {
            report, verdict, ..
        } => {
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(out, "{}", banner_title());
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(out, "{}", pretty(&report.document));
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", verdict_line(verdict));
        }
    }

    let _ = writeln!(
        out,
        "Run {} ({} stages, {} attempts, {} ms)",
        run.run_id,
        run.stages.len(),
        run.total_attempts(),
        run.duration_ms()
    );
    out
}

/// Report title centred under [`RULE`].
fn banner_title() -> String {
    format!("{:^width$}", REPORT_TITLE, width = RULE.len())
        .trim_end()
        .to_string()
}

pub fn verdict_line(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Verified => VERIFIED_LINE.to_string(),
        Verdict::ValidationFailed { status } => format!(
            "[FAILURE] Validation did not pass (status: {}). Check API key or KLEE environment.",
            status
        ),
    }
}

/// Findings table for `analyze`.
pub fn render_findings(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Output dir: {}", analysis.output_dir);

    if analysis.bugs.is_empty() {
        let _ = writeln!(out, "No bugs found.");
        return out;
    }

    let _ = writeln!(out, "{} bug(s) found:", analysis.bugs.len());
    for (i, bug) in analysis.bugs.iter().enumerate() {
        match bug {
            Some(bug) => {
                let _ = writeln!(
                    out,
                    "  #{} line {} [{}] {}: {}",
                    i,
                    bug.line,
                    bug.severity,
                    bug.kind,
                    bug.message.as_deref().unwrap_or("-")
                );
            }
            None => {
                let raw = analysis
                    .document
                    .pointer(&format!("/result/bugs/{}", i))
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let _ = writeln!(out, "  #{} (unrecognised record) {}", i, raw);
            }
        }
    }
    out
}

/// Message printed when a run aborts.
pub fn render_fatal(err: &dyn std::fmt::Display) -> String {
    format!(
        "[FATAL ERROR] The process stopped: {}\nEnsure the analysis service is running and reachable at the configured base URL.",
        err
    )
}

/// Save the report document, pretty-printed.
pub fn write_report(path: &Path, report: &FinalReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&report.document)?;
    std::fs::write(path, json).map_err(FlowError::Io)
}
