//! Task CLI command: run the named lint tasks directly or as a JSON-lines service.
//!
//! Subcommands: run, list, serve.

use clap::{Arg, ArgMatches, Command};
use serde_json::Value;
use tokio::io::BufReader;

use super::config_cmd::required;
use crate::cli::{self, CommandBuilder, CommandCategory, CommandMeta};
use crate::errors::{HarnessError, Result};
use crate::json;
use crate::tasks::{self, drill, TaskRegistry, ANALYZE_HTML, ANALYZE_URL};

/// Build the `task` clap command with subcommands.
pub fn task_command() -> Command {
    Command::new("task")
        .about("Invoke named tasks (tenonAnalyzeUrl, tenonAnalyzeHtml)")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run one task and print its JSON outcome")
                .arg(Arg::new("name").required(true).help("Task name"))
                .arg(
                    Arg::new("arg")
                        .required(true)
                        .help("Task argument (URL or HTML); a JSON-quoted string is unquoted"),
                )
                .arg(
                    Arg::new("its")
                        .long("its")
                        .help("Print only this dotted path of the outcome"),
                ),
        )
        .subcommand(Command::new("list").about("List task names"))
        .subcommand(
            Command::new("serve")
                .about("Answer JSON task requests read line by line from stdin"),
        )
}

/// Build the `CommandMeta` for registry registration.
pub fn task_meta() -> CommandMeta {
    CommandBuilder::from_clap(task_command())
        .category(CommandCategory::Lint)
        .build()
}

/// Names of the tasks installed by `register_lint_tasks`.
pub fn lint_task_names() -> [&'static str; 2] {
    [ANALYZE_HTML, ANALYZE_URL]
}

/// Both tasks take a string. Only an explicitly JSON-quoted argument is
/// decoded; `null`, `42` and the like are passed through as text.
fn task_argument(raw: &str) -> Value {
    let decoded = raw
        .trim_start()
        .starts_with('"')
        .then(|| serde_json::from_str::<String>(raw).ok())
        .flatten();
    Value::String(decoded.unwrap_or_else(|| raw.to_string()))
}

/// Handle `task list`, which needs no credentials.
pub fn handle_task_list(matches: &ArgMatches) -> Result<()> {
    let names = lint_task_names();
    if cli::wants_json(matches) {
        println!("{}", json::serialize_pretty(&names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

/// Handle `task run` and `task serve` against `registry`.
pub async fn handle_task(matches: &ArgMatches, registry: &TaskRegistry) -> Result<()> {
    match matches.subcommand() {
        Some(("run", sub)) => {
            let name = required(sub, "name")?;
            let arg = task_argument(required(sub, "arg")?);
            let value = registry.run(name, arg).await?;
            let shown = match sub.get_one::<String>("its") {
                Some(path) => drill(&value, path).cloned().ok_or_else(|| {
                    HarnessError::Command(format!("outcome has no field '{}'", path))
                })?,
                None => value,
            };
            println!("{}", json::serialize_pretty(&shown)?);
            Ok(())
        }
        Some(("list", sub)) => handle_task_list(sub),
        Some(("serve", _)) => {
            tracing::info!(tasks = ?registry.names(), "serving tasks on stdin");
            let stdin = BufReader::new(tokio::io::stdin());
            let answered = tasks::serve(registry, stdin, tokio::io::stdout()).await?;
            tracing::info!(answered, "task service finished");
            Ok(())
        }
        _ => Err(HarnessError::Command("task requires a subcommand".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> ArgMatches {
        task_command().try_get_matches_from(args).unwrap()
    }

    fn registry() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        registry
            .register(ANALYZE_HTML, |arg| async move {
                Ok(json!({"status": 200, "resultSet": [], "src": arg}))
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_task_meta() {
        let meta = task_meta();
        assert_eq!(meta.name, "task");
        assert_eq!(meta.category, CommandCategory::Lint);
    }

    #[test]
    fn test_list_needs_no_registry() {
        let matches = parse(&["task", "list"]);
        let (_, sub) = matches.subcommand().unwrap();
        handle_task_list(sub).unwrap();
        assert_eq!(lint_task_names(), ["tenonAnalyzeHtml", "tenonAnalyzeUrl"]);
    }

    #[tokio::test]
    async fn test_run_with_its() {
        let registry = registry();
        handle_task(&parse(&["task", "run", ANALYZE_HTML, "<p>x</p>", "--its", "resultSet"]), &registry)
            .await
            .unwrap();

        let err = handle_task(&parse(&["task", "run", ANALYZE_HTML, "<p>x</p>", "--its", "nope"]), &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Command(_)));
    }

    #[tokio::test]
    async fn test_run_unknown_task() {
        let err = handle_task(&parse(&["task", "run", ANALYZE_URL, "https://x.test/"]), &registry())
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::UnknownTask(_)));
    }

    #[test]
    fn test_task_argument_is_always_a_string() {
        assert_eq!(task_argument("<p>x</p>"), Value::String("<p>x</p>".into()));
        assert_eq!(task_argument("null"), Value::String("null".into()));
        assert_eq!(task_argument("42"), Value::String("42".into()));
        assert_eq!(task_argument("true"), Value::String("true".into()));
        assert_eq!(task_argument(r#""<p class=\"a\">x</p>""#), json!("<p class=\"a\">x</p>"));
        assert_eq!(task_argument(r#""unterminated"#), json!(r#""unterminated"#));
    }

    #[tokio::test]
    async fn test_run_passes_literal_null_as_text() {
        let mut registry = TaskRegistry::new();
        registry
            .register(ANALYZE_HTML, |arg| async move {
                assert_eq!(arg, Value::String("null".into()));
                Ok(json!({"status": 200, "resultSet": []}))
            })
            .unwrap();
        handle_task(&parse(&["task", "run", ANALYZE_HTML, "null"]), &registry)
            .await
            .unwrap();
    }
}
