//! Version CLI command: display application version.
//!
//! Honors the global `--json` flag for machine-readable output.

use clap::{ArgMatches, Command};
use serde::Serialize;

use crate::cli::{self, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::Result;
use crate::tasks::{ANALYZE_HTML, ANALYZE_URL};

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    tasks: [&'static str; 2],
}

fn version_info() -> VersionInfo {
    VersionInfo {
        name: "searchmodal",
        version: env!("CARGO_PKG_VERSION"),
        tasks: [ANALYZE_URL, ANALYZE_HTML],
    }
}

/// Build the `version` clap command.
pub fn version_command() -> Command {
    Command::new("version").about("Show version and build information")
}

/// Build the `CommandMeta` for registry registration.
pub fn version_meta() -> CommandMeta {
    CommandBuilder::from_clap(version_command())
        .category(CommandCategory::Core)
        .build()
}

/// Handle the `version` command.
pub fn handle_version(matches: &ArgMatches) -> Result<()> {
    let info = version_info();
    if cli::wants_json(matches) {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{} version {}", info.name, info.version);
    }
    Ok(())
}
