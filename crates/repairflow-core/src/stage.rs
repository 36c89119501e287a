//! The three remote stages of a repairflow run.

use serde::{Deserialize, Serialize};

/// One sequential remote operation against the analysis service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// POST /full-analysis
    Analysis,

    /// POST /repair
    Repair,

    /// POST /report
    Report,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Analysis, Stage::Repair, Stage::Report];

    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Analysis => "analysis",
            Stage::Repair => "repair",
            Stage::Report => "report",
        }
    }

    /// Endpoint path segment under the service base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Stage::Analysis => "full-analysis",
            Stage::Repair => "repair",
            Stage::Report => "report",
        }
    }

    /// 1-based position in the workflow.
    pub fn step(&self) -> u8 {
        match self {
            Stage::Analysis => 1,
            Stage::Repair => 2,
            Stage::Report => 3,
        }
    }

    /// Banner title used in progress output.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Analysis => "INITIAL ANALYSIS",
            Stage::Repair => "AI REPAIR AND VALIDATION",
            Stage::Report => "GENERATE FINAL REPORT",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_endpoints() {
        assert_eq!(Stage::Analysis.endpoint(), "full-analysis");
        assert_eq!(Stage::Repair.endpoint(), "repair");
        assert_eq!(Stage::Report.endpoint(), "report");
    }

    #[test]
    fn test_stage_order() {
        let steps: Vec<u8> = Stage::ALL.iter().map(Stage::step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn test_stage_serde_name() {
        let json = serde_json::to_string(&Stage::Analysis).unwrap();
        assert_eq!(json, "\"analysis\"");
    }
}
