//! HTTP access for the lint commands: page fetches and lint-service form posts.
//!
//! One `reqwest::Client` is shared by every clone and swapped out when the
//! timeout or pool settings in `HarnessConfig` change.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::RwLock;

use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};

/// Status and body of an answered request, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<RwLock<reqwest::Client>>,
}

impl HttpClient {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let client = Self::build_client(config)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(client)),
        })
    }

    pub fn from_defaults() -> Result<Self> {
        Self::new(&HarnessConfig::default())
    }

    /// GET a page body. Non-2xx answers are errors.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!(url, "fetching page");
        let client = self.inner.read().await.clone();
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// POST `fields` as `application/x-www-form-urlencoded`.
    ///
    /// Only transport failures are errors; the caller judges the status.
    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<RawResponse> {
        let client = self.inner.read().await.clone();
        let response = client.post(url).form(fields).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(url, %status, bytes = body.len(), "form posted");
        Ok(RawResponse { status, body })
    }

    /// Rebuild the inner client from updated settings.
    ///
    /// Called from a `ConfigManager::register_on_change` callback.
    pub async fn update_from_config(&self, config: &HarnessConfig) -> Result<()> {
        let rebuilt = Self::build_client(config)?;
        *self.inner.write().await = rebuilt;
        Ok(())
    }

    fn build_client(config: &HarnessConfig) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(concat!("searchmodal/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout as u64))
            .connect_timeout(Duration::from_secs(config.connect_timeout as u64))
            .pool_max_idle_per_host(config.max_idle_conns_per_host as usize)
            .pool_idle_timeout(Duration::from_secs(config.idle_conn_timeout as u64))
            .build()
            .map_err(HarnessError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::Form;
    use axum::http::header::USER_AGENT;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::Router;

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/page.html", get(|| async { "<p>demo</p>" }))
            .route(
                "/gone.html",
                get(|| async { (axum::http::StatusCode::NOT_FOUND, "gone") }),
            )
            .route(
                "/echo",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    (
                        axum::http::StatusCode::UNAUTHORIZED,
                        format!("key={}", form.get("key").cloned().unwrap_or_default()),
                    )
                }),
            )
            .route(
                "/agent",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let base = spawn_server().await;
        let http = HttpClient::from_defaults().unwrap();
        assert_eq!(http.fetch_page(&format!("{base}/page.html")).await.unwrap(), "<p>demo</p>");

        let err = http.fetch_page(&format!("{base}/gone.html")).await.unwrap_err();
        assert!(matches!(err, HarnessError::Transport(_)));

        let agent = http.fetch_page(&format!("{base}/agent")).await.unwrap();
        assert!(agent.starts_with("searchmodal/"));
    }

    #[tokio::test]
    async fn test_post_form_keeps_error_status() {
        let base = spawn_server().await;
        let http = HttpClient::from_defaults().unwrap();
        let answer = http
            .post_form(&format!("{base}/echo"), &[("key", "a b&c"), ("src", "<p/>")])
            .await
            .unwrap();
        assert_eq!(answer.status, StatusCode::UNAUTHORIZED);
        assert_eq!(answer.body, "key=a b&c");
    }

    #[tokio::test]
    async fn test_update_from_config_is_shared() {
        let base = spawn_server().await;
        let http = HttpClient::from_defaults().unwrap();
        let cloned = http.clone();

        let mut config = HarnessConfig::default();
        config.timeout = 5;
        config.max_idle_conns_per_host = 1;
        http.update_from_config(&config).await.unwrap();

        assert_eq!(
            cloned.fetch_page(&format!("{base}/page.html")).await.unwrap(),
            "<p>demo</p>"
        );
    }
}
