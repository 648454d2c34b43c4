//! Accessibility linting through a remote analysis service.

pub mod bridge;
pub mod normalize;
pub mod result;
pub mod tenon;

use async_trait::async_trait;

use crate::errors::Result;

pub use bridge::{validate_url, LintBridge};
pub use normalize::normalize_whitespace;
pub use result::{IssueCounts, LintIssue, LintResult, ResultSummary};
pub use tenon::TenonClient;

/// What to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintSource {
    Url(String),
    Html(String),
}

/// A service that analyzes a page or fragment for accessibility issues.
///
/// Each call yields exactly one outcome; nothing is retried.
#[async_trait]
pub trait LintBackend: Send + Sync {
    async fn analyze(&self, source: &LintSource) -> Result<LintResult>;
}
