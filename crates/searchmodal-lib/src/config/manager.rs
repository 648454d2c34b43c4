use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::settings::HarnessConfig;
use crate::errors::{HarnessError, Result};

type Listener = Box<dyn Fn(&HarnessConfig) + Send + Sync>;

/// Thread-safe manager for `HarnessConfig` with file persistence and change callbacks.
///
/// Loads `config.json` from the given directory, persists every mutation to
/// disk, and notifies registered listeners on change.
pub struct ConfigManager {
    config: Arc<RwLock<HarnessConfig>>,
    config_path: PathBuf,
    on_change: Arc<RwLock<Vec<Listener>>>,
}

impl ConfigManager {
    /// Initialize the config manager rooted at `config_dir`.
    ///
    /// * Creates `config.json` with defaults when missing.
    /// * Falls back to defaults on any read/parse error (logs a warning).
    pub async fn initialize(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_dir.into().join("config.json");
        let config = Self::load_or_create_config(&config_path).await;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            on_change: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Return the path to the configuration file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Return a clone of the current configuration.
    pub async fn get_config(&self) -> HarnessConfig {
        self.config.read().await.clone()
    }

    /// Apply a partial update from a JSON map of key-value pairs.
    ///
    /// Only the keys present in `updates` change. The result is persisted and
    /// all registered callbacks are notified.
    pub async fn update_config(&self, updates: serde_json::Map<String, Value>) -> Result<()> {
        let mut config = self.config.write().await;

        let mut current_value = serde_json::to_value(&*config)
            .map_err(|e| HarnessError::Config(format!("Failed to serialize config: {e}")))?;

        if let Some(obj) = current_value.as_object_mut() {
            for (key, value) in updates {
                if !obj.contains_key(&key) {
                    return Err(HarnessError::Config(format!("Unknown config key: {key}")));
                }
                obj.insert(key, value);
            }
        }

        *config = serde_json::from_value(current_value)
            .map_err(|e| HarnessError::Config(format!("Failed to apply config updates: {e}")))?;

        self.persist(&config).await?;
        self.notify_change(&config).await;

        Ok(())
    }

    /// Reset all fields to their default values, persist, and notify.
    pub async fn reset_to_defaults(&self) -> Result<()> {
        let mut config = self.config.write().await;
        *config = HarnessConfig::default();

        self.persist(&config).await?;
        self.notify_change(&config).await;

        Ok(())
    }

    /// Register a callback that fires on every config change.
    pub async fn register_on_change(
        &self,
        callback: impl Fn(&HarnessConfig) + Send + Sync + 'static,
    ) {
        self.on_change.write().await.push(Box::new(callback));
    }

    // ── private helpers ──────────────────────────────────────────────

    async fn load_or_create_config(path: &Path) -> HarnessConfig {
        if path.exists() {
            match tokio::fs::read_to_string(path).await {
                Ok(contents) => match serde_json::from_str::<HarnessConfig>(&contents) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to parse config file, using defaults"
                        );
                        return HarnessConfig::default();
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to read config file, using defaults"
                    );
                    return HarnessConfig::default();
                }
            }
        }

        let defaults = HarnessConfig::default();
        if let Err(e) = Self::write_config(path, &defaults).await {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to create default config file"
            );
        }
        defaults
    }

    async fn persist(&self, config: &HarnessConfig) -> Result<()> {
        Self::write_config(&self.config_path, config).await
    }

    async fn write_config(path: &Path, config: &HarnessConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HarnessError::Config(format!("Failed to create config dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| HarnessError::Config(format!("Failed to serialize config: {e}")))?;

        tokio::fs::write(path, json)
            .await
            .map_err(|e| HarnessError::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    async fn notify_change(&self, config: &HarnessConfig) {
        let callbacks = self.on_change.read().await;
        for cb in callbacks.iter() {
            cb(config);
        }
    }
}
