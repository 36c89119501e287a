//! Wire schemas for the analysis service.
//!
//! Requests are serialised as-is. Responses are kept as the raw JSON document
//! the service returned, alongside a typed view validated at receipt, so later
//! stages can forward the documents unmodified.

pub mod bug;
pub mod request;
pub mod response;

pub use bug::{BugDetail, Severity};
pub use request::{AnalysisRequest, RepairRequest, ReportRequest};
pub use response::{AnalysisResult, FinalReport, RepairResult, Verdict, VALIDATION_SUCCESS};
