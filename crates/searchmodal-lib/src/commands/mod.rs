pub mod config_cmd;
pub mod lint_cmd;
pub mod registry_cmd;
pub mod scenario_cmd;
pub mod task_cmd;
pub mod version;

use clap::ArgMatches;

use crate::cli::CommandRegistry;
use crate::commands::registry_cmd::ServiceRegistry;
use crate::errors::{HarnessError, Result};

/// Register every subcommand the binary exposes.
pub fn register_commands(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(version::version_meta())?;
    registry.register(config_cmd::config_meta())?;
    registry.register(registry_cmd::registry_meta())?;
    registry.register(lint_cmd::lint_meta())?;
    registry.register(task_cmd::task_meta())?;
    registry.register(scenario_cmd::scenario_meta())?;
    Ok(())
}

/// Route a parsed subcommand to its handler.
///
/// Services are resolved here so that only the commands needing the lint
/// service ask for an API key.
pub async fn dispatch_command(
    name: &str,
    matches: &ArgMatches,
    services: &ServiceRegistry,
) -> Result<()> {
    match name {
        "version" => version::handle_version(matches),
        "config" => config_cmd::handle_config(matches, &services.config_manager).await,
        "registry" => registry_cmd::handle_registry(matches),
        "lint" => {
            let bridge = services.lint_bridge().await?;
            lint_cmd::handle_lint(matches, bridge.as_ref(), &services.http_client).await
        }
        "task" => match matches.subcommand() {
            Some(("list", sub)) => task_cmd::handle_task_list(sub),
            _ => task_cmd::handle_task(matches, services.tasks().await?.as_ref()).await,
        },
        "scenario" => {
            let config = services.config_manager.get_config().await;
            scenario_cmd::handle_scenario(matches, &config).await
        }
        _ => Err(HarnessError::Command(format!("Unknown command: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cli::create_root_command;
    use crate::config::ConfigManager;
    use crate::http_client::HttpClient;

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new(create_root_command());
        register_commands(&mut registry).unwrap();
        registry
    }

    async fn services() -> (tempfile::TempDir, ServiceRegistry) {
        let tmp = tempfile::TempDir::new().unwrap();
        let manager = Arc::new(ConfigManager::initialize(tmp.path()).await.unwrap());
        let http = HttpClient::from_defaults().unwrap();
        (tmp, ServiceRegistry::new(manager, http, None))
    }

    #[test]
    fn test_all_commands_registered() {
        assert_eq!(
            registry().command_names(),
            vec!["config", "lint", "registry", "scenario", "task", "version"]
        );
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = registry();
        assert!(register_commands(&mut registry).is_err());
    }

    #[test]
    fn test_root_parses_nested_subcommands() {
        let root = registry().build_root();
        let matches = root
            .try_get_matches_from(["searchmodal", "--json", "lint", "url", "https://example.com/"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "lint");
        assert_eq!(sub.subcommand_name(), Some("url"));
    }

    #[tokio::test]
    async fn test_lint_without_key_is_missing_credential() {
        let (_tmp, services) = services().await;
        let root = registry().build_root();
        let matches = root
            .try_get_matches_from(["searchmodal", "lint", "url", "https://example.com/"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        let err = dispatch_command(name, sub, &services).await.unwrap_err();
        assert!(matches!(err, HarnessError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_task_list_without_key() {
        let (_tmp, services) = services().await;
        let root = registry().build_root();
        let matches = root
            .try_get_matches_from(["searchmodal", "task", "list"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        dispatch_command(name, sub, &services).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (_tmp, services) = services().await;
        let matches = clap::Command::new("x").try_get_matches_from(["x"]).unwrap();
        assert!(dispatch_command("nope", &matches, &services).await.is_err());
    }
}
