//! Configuration management using the prefer crate for discovery.
//!
//! Layers, lowest priority first: built-in defaults, a config file (given
//! explicitly or discovered by prefer), environment variables, CLI flags.
//! The resulting `Config` is built once at startup and never mutated while a
//! batch runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Name used for config file discovery (`llm-sentiment.toml`, `.json`, ...).
pub const CONFIG_NAME: &str = "llm-sentiment";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input CSV with ProductID and ReviewText columns.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Output CSV path.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// LLM endpoint, model, timeout and retry settings.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path of the file this config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_input() -> PathBuf {
    PathBuf::from("reviews.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("reviews_with_llm_sentiment.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            llm: LlmConfig::default(),
            source_path: None,
        }
        .with_env_overrides()
    }
}

/// Options controlling where configuration is loaded from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file; skips discovery.
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults (with env overrides) when nothing is found.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("Ignoring discovered config: {}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration honoring explicit options.
    /// An explicitly named file that cannot be read or parsed is an error.
    pub async fn load_with_options(options: &LoadOptions) -> Result<Self, ConfigError> {
        match options.config_path {
            Some(ref path) => Self::load_from_path(path).await,
            None => Ok(Self::load().await),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Parse config text in the format implied by a file extension.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        let config: Config = match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            })?,
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            })?,
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            })?,
        };
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// - `SENTIMENT_INPUT`: input CSV path
    /// - `SENTIMENT_OUTPUT`: output CSV path
    /// - `LLM_*`: see [`LlmConfig::with_env_overrides`]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SENTIMENT_INPUT") {
            self.input = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SENTIMENT_OUTPUT") {
            self.output = PathBuf::from(val);
        }
        self.llm = self.llm.with_env_overrides();
        self
    }

    /// Apply command-line overrides, which take priority over everything else.
    pub fn with_cli_overrides(
        mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        endpoint: Option<&str>,
        model: Option<&str>,
    ) -> Self {
        if let Some(input) = input {
            self.input = input;
        }
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(endpoint) = endpoint {
            self.llm = self.llm.with_endpoint(endpoint);
        }
        if let Some(model) = model {
            self.llm = self.llm.with_model(model);
        }
        self
    }
}
