//! Named asynchronous tasks a host process can invoke.
//!
//! The registry maps a task name to a handler taking and returning JSON.
//! `register_lint_tasks` installs `tenonAnalyzeUrl` and `tenonAnalyzeHtml`;
//! [`serve`] exposes the registry over a line-delimited JSON stream.

pub mod serve;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{HarnessError, Result};
use crate::lint::{LintBackend, LintBridge};

pub use serve::{serve, TaskRequest, TaskResponse};

pub const ANALYZE_URL: &str = "tenonAnalyzeUrl";
pub const ANALYZE_HTML: &str = "tenonAnalyzeHtml";

pub type TaskFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;
type Handler = Box<dyn Fn(Value) -> TaskFuture + Send + Sync>;

#[derive(Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Handler>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. Returns an error if the name is taken.
    pub fn register<F, Fut>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        if self.tasks.contains_key(name) {
            return Err(HarnessError::Command(format!("duplicate task name: {name}")));
        }
        self.tasks.insert(
            name.to_string(),
            Box::new(move |arg| Box::pin(handler(arg)) as TaskFuture),
        );
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the task `name` with `arg` and wait for its single outcome.
    pub async fn run(&self, name: &str, arg: Value) -> Result<Value> {
        let handler = self
            .tasks
            .get(name)
            .ok_or_else(|| HarnessError::UnknownTask(name.to_string()))?;
        tracing::debug!(task = name, "running task");
        handler(arg).await
    }
}

/// Install the two lint tasks backed by `bridge`.
pub fn register_lint_tasks<B>(registry: &mut TaskRegistry, bridge: Arc<LintBridge<B>>) -> Result<()>
where
    B: LintBackend + 'static,
{
    let url_bridge = Arc::clone(&bridge);
    registry.register(ANALYZE_URL, move |arg| {
        let bridge = Arc::clone(&url_bridge);
        async move {
            let url = string_arg(ANALYZE_URL, arg)?;
            let result = bridge.analyze_url(&url).await?;
            Ok(serde_json::to_value(result)?)
        }
    })?;

    registry.register(ANALYZE_HTML, move |arg| {
        let bridge = Arc::clone(&bridge);
        async move {
            let html = string_arg(ANALYZE_HTML, arg)?;
            let result = bridge.analyze_html(&html).await?;
            Ok(serde_json::to_value(result)?)
        }
    })?;

    Ok(())
}

fn string_arg(task: &str, arg: Value) -> Result<String> {
    match arg {
        Value::String(s) => Ok(s),
        other => Err(HarnessError::TaskArgument {
            task: task.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

/// Look up a dotted path such as `resultSet.0.errorTitle`.
///
/// Numeric segments index arrays; an empty path returns `value` itself.
pub fn drill<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{LintResult, LintSource};
    use async_trait::async_trait;
    use serde_json::json;

    struct Canned;

    #[async_trait]
    impl LintBackend for Canned {
        async fn analyze(&self, source: &LintSource) -> Result<LintResult> {
            let title = match source {
                LintSource::Url(url) => format!("url:{url}"),
                LintSource::Html(html) => format!("html:{html}"),
            };
            Ok(serde_json::from_value(json!({
                "status": 200,
                "resultSet": [{"errorTitle": title}],
                "resultSummary": {"issues": {"totalErrors": 1}}
            }))?)
        }
    }

    fn registry() -> TaskRegistry {
        let mut registry = TaskRegistry::new();
        register_lint_tasks(&mut registry, Arc::new(LintBridge::new(Canned))).unwrap();
        registry
    }

    #[test]
    fn test_names() {
        assert_eq!(registry().names(), vec![ANALYZE_HTML, ANALYZE_URL]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = registry();
        let err = registry
            .register(ANALYZE_URL, |_| async { Ok(Value::Null) })
            .unwrap_err();
        assert!(matches!(err, HarnessError::Command(_)));
    }

    #[tokio::test]
    async fn test_analyze_url_task() {
        let value = registry()
            .run(ANALYZE_URL, json!("https://example.com/"))
            .await
            .unwrap();
        assert_eq!(
            drill(&value, "resultSet.0.errorTitle"),
            Some(&json!("url:https://example.com/"))
        );
    }

    #[tokio::test]
    async fn test_analyze_html_task_normalizes() {
        let value = registry()
            .run(ANALYZE_HTML, json!("<p>a</p>\n  <p>b</p>"))
            .await
            .unwrap();
        assert_eq!(
            drill(&value, "resultSet.0.errorTitle"),
            Some(&json!("html:<p>a</p><p>b</p>"))
        );
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let err = registry().run("nope", Value::Null).await.unwrap_err();
        assert!(matches!(err, HarnessError::UnknownTask(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_non_string_argument() {
        let err = registry().run(ANALYZE_URL, json!(42)).await.unwrap_err();
        assert!(matches!(err, HarnessError::TaskArgument { .. }));
    }

    #[test]
    fn test_drill() {
        let value = json!({"a": {"b": [10, {"c": "x"}]}});
        assert_eq!(drill(&value, "a.b.0"), Some(&json!(10)));
        assert_eq!(drill(&value, "a.b.1.c"), Some(&json!("x")));
        assert_eq!(drill(&value, "a.b.9"), None);
        assert_eq!(drill(&value, "a.missing"), None);
        assert_eq!(drill(&value, "a.b.x"), None);
        assert_eq!(drill(&value, ""), Some(&value));
    }
}
