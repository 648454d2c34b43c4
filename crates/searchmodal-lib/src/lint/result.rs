use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Data models
// ---------------------------------------------------------------------------

/// Decoded response of the accessibility-analysis service.
///
/// Only the fields the harness inspects are typed; everything else the
/// service returns is kept in `extra` so callers can still drill into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub result_set: Vec<LintIssue>,
    #[serde(default)]
    pub result_summary: ResultSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LintResult {
    pub fn error_count(&self) -> u32 {
        self.result_summary.issues.total_errors
    }

    pub fn warning_count(&self) -> u32 {
        self.result_summary.issues.total_warnings
    }
}

/// One accessibility issue found in the analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintIssue {
    #[serde(default)]
    pub error_title: String,
    #[serde(default)]
    pub error_description: String,
    #[serde(default)]
    pub certainty: u32,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub error_snippet: String,
    #[serde(default)]
    pub xpath: String,
    #[serde(default)]
    pub signature: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    #[serde(default)]
    pub issues: IssueCounts,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCounts {
    #[serde(default)]
    pub total_errors: u32,
    #[serde(default)]
    pub total_warnings: u32,
    #[serde(default)]
    pub total_issues: u32,
}
