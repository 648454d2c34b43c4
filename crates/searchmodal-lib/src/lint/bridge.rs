use super::normalize::normalize_whitespace;
use super::result::LintResult;
use super::{LintBackend, LintSource};
use crate::errors::{HarnessError, Result};

/// The two lint operations the harness exposes.
///
/// URL input is forwarded as given; HTML input has its inter-tag whitespace
/// removed first. Failures from the backend propagate unchanged.
pub struct LintBridge<B> {
    backend: B,
}

impl<B: LintBackend> LintBridge<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Analyze a page the service fetches itself.
    pub async fn analyze_url(&self, url: &str) -> Result<LintResult> {
        validate_url(url)?;
        tracing::info!(url, "analyzing url");
        self.backend.analyze(&LintSource::Url(url.to_string())).await
    }

    /// Analyze an HTML fragment.
    pub async fn analyze_html(&self, fragment: &str) -> Result<LintResult> {
        let html = normalize_whitespace(fragment);
        tracing::info!(
            original = fragment.len(),
            normalized = html.len(),
            "analyzing html fragment"
        );
        self.backend.analyze(&LintSource::Html(html)).await
    }
}

/// Accept only absolute `http`/`https` URLs with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let invalid = |reason: &str| HarnessError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs can be analyzed"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host"));
    }
    Ok(())
}
