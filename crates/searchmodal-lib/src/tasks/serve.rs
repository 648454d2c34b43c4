//! Line-delimited JSON task protocol.
//!
//! Each input line is a [`TaskRequest`]; each produces exactly one
//! [`TaskResponse`] line, in order. Malformed lines get an error response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::TaskRegistry;
use crate::errors::{HarnessError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub id: Value,
    pub task: String,
    #[serde(default)]
    pub arg: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Diagnostic payload of a lint-service rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

impl TaskResponse {
    pub fn success(id: Value, value: Value) -> Self {
        Self {
            id,
            ok: true,
            value: Some(value),
            error: None,
            info: None,
        }
    }

    pub fn failure(id: Value, err: &HarnessError) -> Self {
        let info = match err {
            HarnessError::LintService { info, .. } => Some(info.clone()),
            _ => None,
        };
        Self {
            id,
            ok: false,
            value: None,
            error: Some(err.to_string()),
            info,
        }
    }
}

/// Answer requests from `reader` on `writer` until end of input.
///
/// Returns the number of requests answered.
pub async fn serve<R, W>(registry: &TaskRegistry, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(registry, &line).await;
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
        answered += 1;
    }

    tracing::debug!(answered, "task stream closed");
    Ok(answered)
}

async fn handle_line(registry: &TaskRegistry, line: &str) -> TaskResponse {
    let request: TaskRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "malformed task request");
            return TaskResponse::failure(Value::Null, &HarnessError::Json(e));
        }
    };

    match registry.run(&request.task, request.arg).await {
        Ok(value) => TaskResponse::success(request.id, value),
        Err(e) => {
            tracing::warn!(task = %request.task, error = %e, "task failed");
            TaskResponse::failure(request.id, &e)
        }
    }
}
