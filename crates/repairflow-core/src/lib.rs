//! repairflow core library
//!
//! Client side of the analysis / AI-repair service. A run submits source code
//! to `full-analysis`, forwards the first reported bug to `repair`, asks
//! `report` to consolidate both results, and checks the report's repair
//! status.
//!
//! ## Key Components
//!
//! - `ResilientSender`: JSON POST with a fixed-count, fixed-delay retry policy
//! - `Transport` / `Sleeper`: seams for the HTTP client and retry delays
//! - `WorkflowRunner`: the three-stage pipeline and its verdict

pub mod config;
pub mod domain;
mod error;
pub mod fakes;
pub mod render;
pub mod sample;
pub mod sender;
pub mod stage;
pub mod telemetry;
pub mod transport;
pub mod workflow;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use domain::{
    AnalysisRequest, AnalysisResult, BugDetail, FinalReport, RepairRequest, RepairResult,
    ReportRequest, Severity, Verdict, VALIDATION_SUCCESS,
};
pub use error::FlowError;
pub use render::{render_fatal, render_findings, render_outcome, write_report};
pub use sample::{sample_request, SAMPLE_FILENAME, SAMPLE_SOURCE};
pub use sender::{Delivery, ResilientSender, RetryPolicy, Sleeper, TokioSleeper};
pub use stage::Stage;
pub use telemetry::init_tracing;
pub use transport::{HttpTransport, Transport, TransportError};
pub use workflow::{StageRecord, WorkflowOutcome, WorkflowRun, WorkflowRunner};

/// Result type for repairflow operations
pub type Result<T> = std::result::Result<T, FlowError>;
