//! Registry CLI command: list registered commands (text and JSON).
//!
//! Named `registry_cmd` to avoid conflict with the `cli::registry` module.
//!
//! Also contains `ServiceRegistry`, the central holder for lazily-initialized
//! service instances shared across command handlers.

use std::sync::Arc;

use clap::{ArgMatches, Command};
use tokio::sync::OnceCell;

use crate::cli::{self, create_root_command, CommandBuilder, CommandCategory, CommandMeta, CommandRegistry};
use crate::config::ConfigManager;
use crate::errors::{HarnessError, Result};
use crate::http_client::HttpClient;
use crate::lint::{LintBridge, TenonClient};
use crate::tasks::{register_lint_tasks, TaskRegistry};

// ---------------------------------------------------------------------------
// ServiceRegistry
// ---------------------------------------------------------------------------

/// Central holder for lazily-initialized service instances.
///
/// Created once at startup and passed to the command dispatch layer. The
/// Tenon client is only built on first use, so commands that never lint do
/// not need an API key.
pub struct ServiceRegistry {
    pub config_manager: Arc<ConfigManager>,
    pub http_client: HttpClient,
    api_key: Option<String>,
    lint_bridge: OnceCell<Arc<LintBridge<TenonClient>>>,
    tasks: OnceCell<Arc<TaskRegistry>>,
}

impl ServiceRegistry {
    pub fn new(
        config_manager: Arc<ConfigManager>,
        http_client: HttpClient,
        api_key: Option<String>,
    ) -> Self {
        Self {
            config_manager,
            http_client,
            api_key,
            lint_bridge: OnceCell::new(),
            tasks: OnceCell::new(),
        }
    }

    /// Rebuild the shared `HttpClient` whenever timeout or pool settings change.
    pub async fn register_config_listeners(&self) {
        let http = self.http_client.clone();
        self.config_manager
            .register_on_change(move |cfg| {
                let http = http.clone();
                let cfg = cfg.clone();
                tokio::spawn(async move {
                    if let Err(e) = http.update_from_config(&cfg).await {
                        tracing::warn!("Failed to update HttpClient from config: {e}");
                    }
                });
            })
            .await;
    }

    /// Lazily build the lint bridge around a `TenonClient`.
    ///
    /// Fails with `MissingCredential` when no API key was supplied.
    pub async fn lint_bridge(&self) -> Result<&Arc<LintBridge<TenonClient>>> {
        self.lint_bridge
            .get_or_try_init(|| async {
                let key = self.api_key.clone().ok_or_else(|| {
                    HarnessError::MissingCredential("TENON_API_KEY is not set".into())
                })?;
                let config = self.config_manager.get_config().await;
                let client = TenonClient::from_config(self.http_client.clone(), key, &config);
                tracing::debug!(endpoint = client.endpoint(), "lint client ready");
                Ok(Arc::new(LintBridge::new(client)))
            })
            .await
    }

    /// Lazily build the task registry with the lint tasks installed.
    pub async fn tasks(&self) -> Result<&Arc<TaskRegistry>> {
        self.tasks
            .get_or_try_init(|| async {
                let bridge = Arc::clone(self.lint_bridge().await?);
                let mut registry = TaskRegistry::new();
                register_lint_tasks(&mut registry, bridge)?;
                Ok(Arc::new(registry))
            })
            .await
    }
}

// ---------------------------------------------------------------------------
// registry command
// ---------------------------------------------------------------------------

/// Build the `registry` clap command.
pub fn registry_command() -> Command {
    Command::new("registry").about("List registered commands by category")
}

/// Build the `CommandMeta` for registry registration.
pub fn registry_meta() -> CommandMeta {
    CommandBuilder::from_clap(registry_command())
        .category(CommandCategory::Core)
        .build()
}

/// Handle the `registry` command.
///
/// The dispatch layer has already consumed the live registry, so a fresh one
/// is assembled for listing.
pub fn handle_registry(matches: &ArgMatches) -> Result<()> {
    let mut registry = CommandRegistry::new(create_root_command());
    super::register_commands(&mut registry)?;

    if cli::wants_json(matches) {
        println!("{}", registry.listing_json()?);
    } else {
        print!("{}", registry.listing());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn services(api_key: Option<&str>) -> (tempfile::TempDir, ServiceRegistry) {
        let tmp = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(ConfigManager::initialize(tmp.path()).await.unwrap());
        let http = HttpClient::from_defaults().unwrap();
        (tmp, ServiceRegistry::new(manager, http, api_key.map(String::from)))
    }

    #[tokio::test]
    async fn test_lint_bridge_requires_key() {
        let (_tmp, services) = services(None).await;
        let err = services.lint_bridge().await.err().unwrap();
        assert!(matches!(err, HarnessError::MissingCredential(_)));
        assert!(services.tasks().await.is_err());
    }

    #[tokio::test]
    async fn test_lint_bridge_uses_configured_endpoint() {
        let (_tmp, services) = services(Some("k")).await;
        let bridge = services.lint_bridge().await.unwrap();
        assert_eq!(bridge.backend().endpoint(), "https://tenon.io/api/");

        let again = services.lint_bridge().await.unwrap();
        assert!(Arc::ptr_eq(bridge, again));
    }

    #[tokio::test]
    async fn test_tasks_registered() {
        let (_tmp, services) = services(Some("k")).await;
        let tasks = services.tasks().await.unwrap();
        assert_eq!(tasks.names(), vec!["tenonAnalyzeHtml", "tenonAnalyzeUrl"]);
    }

    #[test]
    fn test_registry_meta() {
        let meta = registry_meta();
        assert_eq!(meta.name, "registry");
        assert_eq!(meta.category, CommandCategory::Core);
    }

    #[test]
    fn test_handle_registry_lists() {
        let matches = registry_command().try_get_matches_from(["registry"]).unwrap();
        handle_registry(&matches).unwrap();
    }
}
