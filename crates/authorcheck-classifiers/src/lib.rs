//! authorcheck Classifiers
//!
//! Text classification for telling human writing from AI writing.
//!
//! - [`Classifier`] is the inference seam: text in, ranked labels out.
//! - [`ModelLoader`] turns a [`ModelConfig`] into a classifier; the Candle
//!   implementation ([`CandleModelLoader`]) runs RoBERTa checkpoints from
//!   the Hugging Face Hub on CPU.
//! - [`SharedClassifier`] loads the model once and hands the same handle to
//!   every caller for the life of the process.
//! - [`Attribution`] maps the model's label to a human/AI verdict.

pub mod attribution;
#[cfg(feature = "ml-models")]
pub mod candle_loader;
pub mod classifier;
pub mod loader_plugin;
pub mod model_config;
pub mod shared;

pub use attribution::{Attribution, AI_LABEL_MARKERS};
#[cfg(feature = "ml-models")]
pub use candle_loader::{CandleModelLoader, RobertaSequenceClassifier};
pub use classifier::{ClassificationResult, Classifier};
pub use loader_plugin::ModelLoader;
pub use model_config::{
    ArchitectureConfig, InferenceConfig, ModelConfig, ModelSource, DEFAULT_MODEL_REPO,
};
pub use shared::{ClassifierHandle, SharedClassifier};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attribution::Attribution;
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::loader_plugin::ModelLoader;
    pub use crate::model_config::ModelConfig;
    pub use crate::shared::{ClassifierHandle, SharedClassifier};
}
