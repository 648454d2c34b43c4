use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote call could not be completed (DNS, connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The lint service answered but reported a failure status.
    #[error("Lint service error ({status}): {info}")]
    LintService {
        status: u16,
        info: serde_json::Value,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Invalid argument for task {task}: {message}")]
    TaskArgument { task: String, message: String },

    #[error("Command error: {0}")]
    Command(String),

    #[error("{0}")]
    Application(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Logs a fatal error and exits the process with code 1.
///
/// This function never returns (`-> !`). It is intended for unrecoverable
/// errors during initialization or command execution.
pub fn handle_fatal(err: HarnessError) -> ! {
    tracing::error!("Fatal error: {}", err);
    std::process::exit(1)
}

/// Maps a `HarnessError` to user-friendly CLI output with actionable suggestions.
pub fn handle_command_error(err: &HarnessError) {
    use crate::output;

    match err {
        HarnessError::MissingCredential(msg) => {
            output::error(&format!("Missing credential: {}", msg));
            output::info("Export TENON_API_KEY before running lint commands.");
        }
        HarnessError::Transport(e) => {
            output::error(&format!("Network error: {}", e));
            output::info("Check your internet connection and the configured tenonApiUrl.");
        }
        HarnessError::LintService { status, info } => {
            output::error(&format!("Lint service rejected the request ({})", status));
            output::info(&info.to_string());
        }
        HarnessError::InvalidUrl { url, reason } => {
            output::error(&format!("Invalid URL '{}': {}", url, reason));
            output::info("Pass a fully qualified URL, e.g. https://example.com/page.html");
        }
        HarnessError::Io(e) => {
            output::error(&format!("File error: {}", e));
        }
        HarnessError::Config(msg) => {
            output::error(&format!("Configuration error: {}", msg));
            output::info("Run `searchmodal config reset` to restore defaults.");
        }
        HarnessError::UnknownTask(name) => {
            output::error(&format!("Unknown task: {}", name));
            output::info("Run `searchmodal task list` to see registered tasks.");
        }
        HarnessError::Command(msg) => {
            output::error(&format!("Error: {}", msg));
        }
        _ => {
            output::error(&format!("{}", err));
        }
    }
}
