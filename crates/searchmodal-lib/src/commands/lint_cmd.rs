//! Lint CLI command: send a page or fragment to the accessibility service.
//!
//! Subcommands: url, html, fragment.

use std::path::Path;

use clap::{Arg, ArgMatches, Command};

use super::config_cmd::required;
use crate::cli::{self, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::{HarnessError, Result};
use crate::html;
use crate::http_client::HttpClient;
use crate::lint::{LintBackend, LintBridge, LintResult};
use crate::logger;
use crate::output;
use crate::tasks::drill;

/// Navigation holding the modal's launch button.
pub const DEFAULT_SELECTOR: &str = ".b-nav-primary [data-modaal-ajax-search]";

fn report_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("expect-clean")
            .long("expect-clean")
            .action(clap::ArgAction::SetTrue)
            .help("Fail when the result set is not empty"),
    )
    .arg(
        Arg::new("field")
            .long("field")
            .help("Print only this dotted path of the result, e.g. resultSet.0.errorTitle"),
    )
}

/// Build the `lint` clap command with subcommands.
pub fn lint_command() -> Command {
    Command::new("lint")
        .about("Analyze pages and fragments with the Tenon accessibility service")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(report_args(
            Command::new("url")
                .about("Analyze a page the service fetches itself")
                .arg(Arg::new("url").required(true).help("Absolute http(s) URL")),
        ))
        .subcommand(report_args(
            Command::new("html")
                .about("Analyze an HTML file (`-` reads stdin)")
                .arg(Arg::new("file").required(true).help("Path to an HTML file, or -")),
        ))
        .subcommand(report_args(
            Command::new("fragment")
                .about("Analyze the inner markup of one element of a page")
                .arg(
                    Arg::new("source")
                        .required(true)
                        .help("Page URL or path to a saved page"),
                )
                .arg(
                    Arg::new("selector")
                        .long("selector")
                        .short('s')
                        .default_value(DEFAULT_SELECTOR)
                        .help("CSS selector of the element to analyze"),
                ),
        ))
}

/// Build the `CommandMeta` for registry registration.
pub fn lint_meta() -> CommandMeta {
    CommandBuilder::from_clap(lint_command())
        .category(CommandCategory::Lint)
        .build()
}

/// Handle the `lint` command dispatch.
pub async fn handle_lint<B: LintBackend>(
    matches: &ArgMatches,
    bridge: &LintBridge<B>,
    http: &HttpClient,
) -> Result<()> {
    let (sub, result) = match matches.subcommand() {
        Some(("url", sub)) => (sub, bridge.analyze_url(required(sub, "url")?).await?),
        Some(("html", sub)) => {
            let markup = read_html_file(required(sub, "file")?).await?;
            (sub, bridge.analyze_html(&markup).await?)
        }
        Some(("fragment", sub)) => {
            let source = required(sub, "source")?;
            let selector = required(sub, "selector")?;
            let page = load_page(source, http).await?;
            let fragment = extract_fragment(&page, selector)?;
            (sub, bridge.analyze_html(&fragment).await?)
        }
        _ => return Err(HarnessError::Command("lint requires a subcommand".into())),
    };

    print_result(sub, &result)?;

    if sub.get_flag("expect-clean") && !result.result_set.is_empty() {
        return Err(HarnessError::Command(format!(
            "expected no issues, found {}",
            result.result_set.len()
        )));
    }
    Ok(())
}

async fn read_html_file(file: &str) -> Result<String> {
    if file == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        return Ok(buf);
    }
    Ok(tokio::fs::read_to_string(file).await?)
}

/// Read a page from an http(s) URL or a local file.
pub async fn load_page(source: &str, http: &HttpClient) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return http.fetch_page(source).await;
    }
    Ok(tokio::fs::read_to_string(Path::new(source)).await?)
}

/// Inner markup of the element `selector` picks out of `page`.
pub fn extract_fragment(page: &str, selector: &str) -> Result<String> {
    let document = html::parse(page);
    html::inner_html(&document, selector)?.ok_or_else(|| {
        HarnessError::Command(format!("no element matches selector '{}'", selector))
    })
}

fn print_result(matches: &ArgMatches, result: &LintResult) -> Result<()> {
    if let Some(path) = matches.get_one::<String>("field") {
        let value = serde_json::to_value(result)?;
        let field = drill(&value, path)
            .ok_or_else(|| HarnessError::Command(format!("result has no field '{}'", path)))?;
        println!("{}", serde_json::to_string_pretty(field)?);
        return Ok(());
    }

    if cli::wants_json(matches) {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    print!("{}", summarize(result, logger::is_verbose()));
    output::issue_tally(result.result_set.len());
    Ok(())
}

/// Plain-text rendering of a result: counts, then one entry per issue.
///
/// `verbose` adds each issue's description and offending snippet.
pub fn summarize(result: &LintResult, verbose: bool) -> String {
    let mut out = format!(
        "status {}: {} error(s), {} warning(s)\n",
        result.status,
        result.error_count(),
        result.warning_count()
    );
    for issue in &result.result_set {
        out.push_str(&format!(
            "  [{}/{}] {}\n      {}\n",
            issue.certainty, issue.priority, issue.error_title, issue.xpath
        ));
        if verbose {
            out.push_str(&format!(
                "      {}\n      {}\n",
                issue.error_description, issue.error_snippet
            ));
        }
    }
    out
}
