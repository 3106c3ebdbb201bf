//! Error types for authorcheck

/// Result type alias using authorcheck's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for authorcheck operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model could not be resolved, downloaded or initialized
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// The bound model failed on otherwise valid input
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelLoad(_) => "model_load",
            Self::Inference(_) => "inference",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}
