//! Scenario CLI command: replay search-modal conformance flows against the model.
//!
//! Subcommands: run, list.

use std::path::{Path, PathBuf};

use clap::{Arg, ArgMatches, Command};

use crate::cli::{self, CommandBuilder, CommandCategory, CommandMeta};
use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};
use crate::json;
use crate::output;
use crate::scenario::{self, run_scenario, Scenario, ScenarioReport};
use crate::widget::{DemoCatalog, SessionSettings};

pub const DEFAULT_SCENARIO_DIR: &str = "scenarios";

fn dir_arg() -> Arg {
    Arg::new("dir")
        .long("dir")
        .short('d')
        .default_value(DEFAULT_SCENARIO_DIR)
        .help("Directory searched for .yaml scenario files")
}

/// Build the `scenario` clap command with subcommands.
pub fn scenario_command() -> Command {
    Command::new("scenario")
        .about("Replay search modal conformance flows against the behaviour model")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run scenario files (all files in --dir when none are given)")
                .arg(
                    Arg::new("files")
                        .num_args(0..)
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Scenario files to run"),
                )
                .arg(dir_arg())
                .arg(
                    Arg::new("catalog")
                        .long("catalog")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("YAML catalog replacing the built-in demo data"),
                ),
        )
        .subcommand(Command::new("list").about("List scenario files").arg(dir_arg()))
}

/// Build the `CommandMeta` for registry registration.
pub fn scenario_meta() -> CommandMeta {
    CommandBuilder::from_clap(scenario_command())
        .category(CommandCategory::Conformance)
        .aliases(&["sc"])
        .build()
}

/// Handle the `scenario` command dispatch.
pub async fn handle_scenario(matches: &ArgMatches, config: &HarnessConfig) -> Result<()> {
    match matches.subcommand() {
        Some(("run", sub)) => {
            let files = scenario_files(sub).await?;
            let catalog = match sub.get_one::<PathBuf>("catalog") {
                Some(path) => DemoCatalog::from_yaml(&tokio::fs::read_to_string(path).await?)?,
                None => DemoCatalog::demo(),
            };
            let settings = SessionSettings::from_config(config)?;
            let reports = run_files(&files, &catalog, &settings).await?;
            print_reports(sub, &reports)?;

            let failed = reports.iter().filter(|r| !r.passed()).count();
            if failed > 0 {
                return Err(HarnessError::Command(format!(
                    "{} of {} scenario(s) failed",
                    failed,
                    reports.len()
                )));
            }
            Ok(())
        }
        Some(("list", sub)) => {
            let files = scenario::discover(Path::new(dir(sub))).await?;
            if cli::wants_json(sub) {
                println!("{}", json::serialize_pretty(&files)?);
            } else {
                for file in files {
                    println!("{}", file.display());
                }
            }
            Ok(())
        }
        _ => Err(HarnessError::Command("scenario requires a subcommand".into())),
    }
}

fn dir(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("dir")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SCENARIO_DIR)
}

async fn scenario_files(matches: &ArgMatches) -> Result<Vec<PathBuf>> {
    let given: Vec<PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|files| files.cloned().collect())
        .unwrap_or_default();
    if !given.is_empty() {
        return Ok(given);
    }
    let found = scenario::discover(Path::new(dir(matches))).await?;
    if found.is_empty() {
        return Err(HarnessError::Command(format!(
            "no scenario files in {}",
            dir(matches)
        )));
    }
    Ok(found)
}

/// Load and replay every file, in order.
pub async fn run_files(
    files: &[PathBuf],
    catalog: &DemoCatalog,
    settings: &SessionSettings,
) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let scenario = Scenario::load(file).await?;
        tracing::debug!(file = %file.display(), steps = scenario.steps.len(), "replaying scenario");
        reports.push(run_scenario(&scenario, catalog, settings));
    }
    Ok(reports)
}

fn print_reports(matches: &ArgMatches, reports: &[ScenarioReport]) -> Result<()> {
    if cli::wants_json(matches) {
        println!("{}", json::serialize_pretty(&reports)?);
        return Ok(());
    }
    for report in reports {
        let subject = format!(
            "{}: {} action(s) applied, {} ignored, {} check(s)",
            report.name,
            report.actions_applied,
            report.actions_ignored,
            report.expectations_checked
        );
        let details = report.failures.iter().map(|failure| {
            format!(
                "step {}: {:?} (actual: {})",
                failure.step, failure.expectation, failure.actual
            )
        });
        output::verdict(report.passed(), &subject, details);
    }
    Ok(())
}
