//! Tenon accessibility-analysis client.
//!
//! Posts the API key plus either a `url` or an HTML `src` as a form to the
//! configured endpoint and decodes the JSON answer into a [`LintResult`].

use async_trait::async_trait;
use serde_json::Value;

use super::result::LintResult;
use super::{LintBackend, LintSource};
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};
use crate::http_client::HttpClient;

pub struct TenonClient {
    http: HttpClient,
    api_key: String,
    endpoint: String,
    failure_threshold: u16,
}

impl TenonClient {
    /// * `endpoint` – full analysis URL, e.g. `https://tenon.io/api/`
    /// * `failure_threshold` – reported statuses above this reject the call
    pub fn new(
        http: HttpClient,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        failure_threshold: u16,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            failure_threshold,
        }
    }

    pub fn from_config(http: HttpClient, api_key: impl Into<String>, config: &HarnessConfig) -> Self {
        Self::new(
            http,
            api_key,
            config.tenon_api_url.clone(),
            config.failure_status_threshold,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn a response body into exactly one outcome.
    fn interpret(&self, http_status: reqwest::StatusCode, body: &str) -> Result<LintResult> {
        match serde_json::from_str::<LintResult>(body) {
            Ok(result) if result.status > self.failure_threshold => {
                tracing::warn!(status = result.status, "lint service reported failure");
                Err(HarnessError::LintService {
                    status: result.status,
                    info: result.info.unwrap_or(Value::Null),
                })
            }
            Ok(result) => Ok(result),
            Err(_) if !http_status.is_success() => Err(HarnessError::LintService {
                status: http_status.as_u16(),
                info: Value::String(body.to_string()),
            }),
            Err(e) => Err(HarnessError::Json(e)),
        }
    }
}

#[async_trait]
impl LintBackend for TenonClient {
    async fn analyze(&self, source: &LintSource) -> Result<LintResult> {
        let (field, value) = match source {
            LintSource::Url(url) => ("url", url.as_str()),
            LintSource::Html(html) => ("src", html.as_str()),
        };
        tracing::info!(endpoint = %self.endpoint, kind = field, bytes = value.len(), "submitting to lint service");

        let answer = self
            .http
            .post_form(&self.endpoint, &[("key", self.api_key.as_str()), (field, value)])
            .await?;
        let outcome = self.interpret(answer.status, &answer.body);
        if let Ok(result) = &outcome {
            tracing::info!(
                status = result.status,
                issues = result.result_set.len(),
                "lint service answered"
            );
        }
        outcome
    }
}
