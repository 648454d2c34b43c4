use std::path::PathBuf;
use std::sync::OnceLock;

/// Process-level settings read once from the environment at startup.
///
/// Access via `EnvConfig::get()` which returns a `&'static EnvConfig`.
pub struct EnvConfig {
    /// Tenon API key (`TENON_API_KEY`). Lint commands refuse to run without it.
    pub tenon_api_key: Option<String>,
    /// Directory holding `config.json` (`SEARCHMODAL_HOME`, default `~/.searchmodal`).
    pub home_dir: PathBuf,
}

static CONFIG: OnceLock<EnvConfig> = OnceLock::new();

impl EnvConfig {
    /// Returns a reference to the global `EnvConfig` singleton.
    /// Initializes from environment variables on first call.
    pub fn get() -> &'static EnvConfig {
        CONFIG.get_or_init(EnvConfig::from_env)
    }

    fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the real environment in production).
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
        let home_dir = lookup("SEARCHMODAL_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&home).join(".searchmodal"));

        Self {
            tenon_api_key: lookup("TENON_API_KEY").filter(|k| !k.trim().is_empty()),
            home_dir,
        }
    }
}
