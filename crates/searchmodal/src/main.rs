use std::sync::Arc;

use searchmodal_lib::cli::{create_root_command, is_verbose, wants_json, CommandRegistry};
use searchmodal_lib::commands::register_commands;
use searchmodal_lib::commands::registry_cmd::ServiceRegistry;
use searchmodal_lib::config::{ConfigManager, EnvConfig};
use searchmodal_lib::errors::{handle_command_error, handle_fatal, HarnessError};
use searchmodal_lib::http_client::HttpClient;

#[tokio::main]
async fn main() {
    // Step 1: Environment settings (singleton, from env vars)
    let env = EnvConfig::get();

    // Step 2: Build the command tree and parse arguments
    let mut registry = CommandRegistry::new(create_root_command());
    if let Err(e) = register_commands(&mut registry) {
        handle_fatal(e);
    }
    let matches = registry.build_root().get_matches();

    // Step 3: Logger, honoring --verbose and --json
    let verbose = is_verbose(&matches);
    if wants_json(&matches) {
        searchmodal_lib::logger::init_json(verbose);
    } else {
        searchmodal_lib::logger::init(verbose);
    }
    searchmodal_lib::logger::set_verbose(verbose);

    // Step 4: Persisted config, shared HTTP client, lazy services
    let config_manager = match ConfigManager::initialize(&env.home_dir).await {
        Ok(manager) => Arc::new(manager),
        Err(e) => handle_fatal(e),
    };
    let config = config_manager.get_config().await;
    let http_client = match HttpClient::new(&config) {
        Ok(client) => client,
        Err(e) => handle_fatal(e),
    };
    let services = ServiceRegistry::new(config_manager, http_client, env.tenon_api_key.clone());
    services.register_config_listeners().await;

    // Step 5: Dispatch to subcommand handler
    match matches.subcommand() {
        Some((name, sub_matches)) => {
            tracing::debug!(command = name, "Executing command");
            if let Err(e) =
                searchmodal_lib::commands::dispatch_command(name, sub_matches, &services).await
            {
                handle_command_error(&e);
                std::process::exit(1);
            }
        }
        None => {
            let mut registry = CommandRegistry::new(create_root_command());
            if let Err(e) = register_commands(&mut registry) {
                handle_fatal(e);
            }
            if let Err(e) = registry.build_root().print_help() {
                handle_fatal(HarnessError::Application(format!("Failed to print help: {e}")));
            }
        }
    }
}
