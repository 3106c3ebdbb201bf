use crate::config::AppConfig;
use authorcheck_classifiers::{ModelLoader, SharedClassifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<AppConfig>,

    /// The one classifier every request goes through
    pub classifier: Arc<SharedClassifier>,

    /// Prometheus renderer, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, loader: Arc<dyn ModelLoader>) -> Self {
        let classifier = SharedClassifier::new(config.model.clone(), loader);
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Load the model now so the first analysis does not pay for it
    pub async fn preload(&self) -> authorcheck_core::Result<()> {
        self.classifier.get().await.map(|_| ())
    }
}
