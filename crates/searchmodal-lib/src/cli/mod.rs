pub mod registry;

pub use registry::{CommandBuilder, CommandCategory, CommandMeta, CommandRegistry};

/// Creates the root clap Command with global `--verbose` and `--json` flags.
///
/// The `--verbose` / `-v` flag enables debug logging across all subcommands.
/// When combined with `--json`, verbose output is suppressed to keep JSON clean.
pub fn create_root_command() -> clap::Command {
    clap::Command::new("searchmodal")
        .about("Search modal conformance model and Tenon accessibility lint bridge")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Output in JSON format"),
        )
}

/// Returns whether verbose mode is active based on parsed matches.
///
/// Verbose is suppressed when `--json` is also set, to keep JSON output clean.
pub fn is_verbose(matches: &clap::ArgMatches) -> bool {
    let verbose = matches.get_flag("verbose");
    let json = matches.get_flag("json");
    verbose && !json
}

/// Whether `--json` was given anywhere on the command line.
///
/// Tolerates matches from a subcommand parsed on its own, where the global
/// flag is not defined.
pub fn wants_json(matches: &clap::ArgMatches) -> bool {
    matches
        .try_get_one::<bool>("json")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}
