//! Configuration management for dag-bisect

use crate::types::OutputFormat;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_OUTPUT_FORMAT: &str = "DAG_BISECT_OUTPUT_FORMAT";
pub const ENV_LOG_LEVEL: &str = "DAG_BISECT_LOG_LEVEL";
pub const ENV_COMMENT_PREFIX: &str = "DAG_BISECT_COMMENT_PREFIX";

/// Read when no `--config` is given and the file exists
pub const DEFAULT_CONFIG_FILE: &str = "dag-bisect.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub comment_prefix: String,
    pub skip_blank_lines: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub separator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            comment_prefix: "#".to_string(),
            skip_blank_lines: true,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            separator: ", ".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// An explicit path wins; otherwise `default_path` is used only if it exists
pub fn resolve_config_path(explicit: Option<PathBuf>, default_path: &Path) -> Option<PathBuf> {
    explicit.or_else(|| default_path.exists().then(|| default_path.to_path_buf()))
}

impl Config {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings with any `DAG_BISECT_*` variables that are set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(ENV_OUTPUT_FORMAT) {
            self.output.format = format.parse()?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        if let Some(prefix) = lookup(ENV_COMMENT_PREFIX) {
            self.input.comment_prefix = prefix;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.separator.is_empty() {
            return Err(anyhow::anyhow!("Output separator must not be empty"));
        }

        if self.input.comment_prefix.trim().is_empty() {
            return Err(anyhow::anyhow!("Comment prefix must not be empty"));
        }

        if self.logging.level.trim().is_empty() {
            return Err(anyhow::anyhow!("Log level must not be empty"));
        }

        Ok(())
    }
}
