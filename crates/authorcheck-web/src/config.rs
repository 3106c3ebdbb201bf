//! Application configuration

use crate::cli::ModelArgs;
use anyhow::Context;
use authorcheck_classifiers::{ModelConfig, ModelSource};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "authorcheck.yaml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Load the model before accepting requests
    #[serde(default = "default_true")]
    pub preload: bool,

    /// The bound model
    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            preload: true,
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and apply CLI overrides.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(args: &ModelArgs) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_model_args(args);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `--model` naming an existing directory selects a local source,
    /// anything else is treated as a Hub repo id.
    pub fn apply_model_args(&mut self, args: &ModelArgs) {
        if let Some(model) = &args.model {
            let path = PathBuf::from(model);
            self.model.source = if path.is_dir() {
                ModelSource::Local { path }
            } else {
                ModelSource::HuggingFace {
                    repo: model.clone(),
                    revision: "main".to_string(),
                }
            };
        }

        if let Some(device) = &args.device {
            self.model.inference.device = device.clone();
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.server.address, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid listen address {}:{}",
                    self.server.address, self.server.port
                )
            })
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_true() -> bool {
    true
}
