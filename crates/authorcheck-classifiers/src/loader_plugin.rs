//! Extension point for model-backed classifier loading.

use crate::classifier::Classifier;
use crate::model_config::ModelConfig;
use authorcheck_core::Result;

/// Pluggable backend that turns a model configuration into a classifier.
///
/// The Candle implementation lives in [`crate::candle_loader`]; tests
/// substitute in-memory loaders to observe how often loading happens.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    /// Resolve and initialize the model described by `config`.
    async fn load_classifier(&self, config: &ModelConfig) -> Result<Box<dyn Classifier>>;
}
