//! Config CLI command: view and modify configuration.
//!
//! Subcommands: show, set, reset, path.
//! Named `config_cmd` to avoid conflict with the `config` module.

use clap::{Arg, ArgMatches, Command};

use crate::cli::{CommandBuilder, CommandCategory, CommandMeta};
use crate::config::ConfigManager;
use crate::errors::{HarnessError, Result};
use crate::json;
use crate::output;

/// Build the `config` clap command.
pub fn config_command() -> Command {
    Command::new("config")
        .about("Show or change harness settings")
        .subcommand(Command::new("show").about("Print the current configuration (default)"))
        .subcommand(
            Command::new("set")
                .about("Change one setting, e.g. `config set pageSize 10`")
                .arg(Arg::new("key").required(true).help("camelCase setting name"))
                .arg(
                    Arg::new("value")
                        .required(true)
                        .help("New value; parsed as JSON when possible"),
                ),
        )
        .subcommand(Command::new("reset").about("Restore every setting to its default"))
        .subcommand(Command::new("path").about("Print the configuration file path"))
}

/// Build the `CommandMeta` for registry registration.
pub fn config_meta() -> CommandMeta {
    CommandBuilder::from_clap(config_command())
        .category(CommandCategory::Core)
        .aliases(&["conf"])
        .build()
}

/// Handle the `config` command.
pub async fn handle_config(matches: &ArgMatches, config_mgr: &ConfigManager) -> Result<()> {
    match matches.subcommand() {
        None | Some(("show", _)) => {
            let config = config_mgr.get_config().await;
            println!("{}", json::serialize_pretty(&config)?);
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = json::parse_loose(required(sub, "value")?);
            let mut updates = serde_json::Map::new();
            updates.insert(key.to_string(), value);
            config_mgr.update_config(updates).await?;
            output::success(&format!("Updated {}", key));
        }
        Some(("reset", _)) => {
            config_mgr.reset_to_defaults().await?;
            output::success("Configuration reset to defaults");
        }
        Some(("path", _)) => {
            println!("{}", config_mgr.config_path().display());
        }
        Some((other, _)) => {
            return Err(HarnessError::Command(format!(
                "unknown config subcommand: {}",
                other
            )))
        }
    }
    Ok(())
}

/// Fetch a required string argument.
pub(crate) fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| HarnessError::Command(format!("missing argument: {}", id)))
}
