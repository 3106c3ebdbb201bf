//! Model configuration structures

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Hub repository of the detector the application is built around
pub const DEFAULT_MODEL_REPO: &str = "Hello-SimpleAI/chatgpt-detector-roberta";

/// Configuration for the bound model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    #[serde(default = "default_name")]
    pub name: String,

    /// Model description
    #[serde(default)]
    pub description: String,

    /// Model source (where to load from)
    #[serde(default)]
    pub source: ModelSource,

    /// Model architecture configuration
    #[serde(default)]
    pub architecture: ArchitectureConfig,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Override for the Hugging Face download cache
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_name() -> String {
    "chatgpt-detector-roberta".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: "RoBERTa fine-tuned to tell human answers from ChatGPT answers"
                .to_string(),
            source: ModelSource::default(),
            architecture: ArchitectureConfig::default(),
            inference: InferenceConfig::default(),
            cache_dir: None,
        }
    }
}

impl ModelConfig {
    /// Load a model configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> authorcheck_core::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| {
            authorcheck_core::Error::config(format!(
                "Failed to parse model config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Identifier shown to users: the hub repo or the local path
    pub fn model_id(&self) -> String {
        match &self.source {
            ModelSource::Local { path } => path.display().to_string(),
            ModelSource::HuggingFace { repo, .. } => repo.clone(),
        }
    }

    /// Cache directory for hub downloads
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("authorcheck")
                .join("hub")
        })
    }
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from local filesystem
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_MODEL_REPO.to_string(),
            revision: default_revision(),
        }
    }
}

fn default_revision() -> String {
    "main".to_string()
}

/// Model architecture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ArchitectureConfig {
    /// RoBERTa for sequence classification
    RobertaSequenceClassification {
        num_labels: usize,
        #[serde(default)]
        labels: Vec<String>,
    },

    /// XLM-RoBERTa for sequence classification (same weight layout)
    XlmRobertaSequenceClassification {
        num_labels: usize,
        #[serde(default)]
        labels: Vec<String>,
    },
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self::RobertaSequenceClassification {
            num_labels: 2,
            labels: Vec::new(),
        }
    }
}

impl ArchitectureConfig {
    pub fn num_labels(&self) -> usize {
        match self {
            Self::RobertaSequenceClassification { num_labels, .. }
            | Self::XlmRobertaSequenceClassification { num_labels, .. } => *num_labels,
        }
    }

    /// Labels from configuration; empty means "read id2label from the model"
    pub fn labels(&self) -> &[String] {
        match self {
            Self::RobertaSequenceClassification { labels, .. }
            | Self::XlmRobertaSequenceClassification { labels, .. } => labels,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RobertaSequenceClassification { .. } => "roberta-sequence-classification",
            Self::XlmRobertaSequenceClassification { .. } => {
                "xlm-roberta-sequence-classification"
            }
        }
    }
}

/// Inference configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in tokens; longer input is truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}
