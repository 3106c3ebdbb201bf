//! Process-wide cached classifier handle

use crate::classifier::Classifier;
use crate::loader_plugin::ModelLoader;
use crate::model_config::ModelConfig;
use authorcheck_core::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// The loaded, reusable classifier bound to one model
pub type ClassifierHandle = Arc<dyn Classifier>;

/// Lazily loads one classifier and hands out the same handle forever after.
///
/// Concurrent first callers wait on a single initialization; a failed load
/// leaves the cell empty so a later call may try again.
pub struct SharedClassifier {
    config: ModelConfig,
    loader: Arc<dyn ModelLoader>,
    cell: OnceCell<ClassifierHandle>,
    loads: AtomicUsize,
}

impl SharedClassifier {
    pub fn new(config: ModelConfig, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            config,
            loader,
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the handle, loading the model on first use
    pub async fn get(&self) -> Result<ClassifierHandle> {
        let handle = self
            .cell
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                metrics::counter!("authorcheck_model_loads_total").increment(1);

                let model_id = self.config.model_id();
                tracing::info!(model = %model_id, "Loading classifier");
                let start = Instant::now();

                match self.loader.load_classifier(&self.config).await {
                    Ok(classifier) => {
                        tracing::info!(
                            model = %model_id,
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "Classifier ready"
                        );
                        Ok(Arc::from(classifier))
                    }
                    Err(e) => {
                        tracing::error!(model = %model_id, error = %e, "Classifier load failed");
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Whether the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of times the load step has run
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassificationResult;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;

    struct FixedClassifier;

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
            Ok(ClassificationResult::new("Human", 0.9))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
        fail_first: AtomicBool,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        async fn load_classifier(&self, _config: &ModelConfig) -> Result<Box<dyn Classifier>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.swap(false, Ordering::SeqCst) {
                return Err(authorcheck_core::Error::model_load("hub unreachable"));
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            Ok(Box::new(FixedClassifier))
        }
    }

    #[tokio::test]
    async fn test_same_handle_returned() {
        let loader = Arc::new(CountingLoader::default());
        let shared = SharedClassifier::new(ModelConfig::default(), loader.clone());
        assert!(!shared.is_loaded());

        let first = shared.get().await.unwrap();
        let second = shared.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(shared.is_loaded());
        assert_eq!(shared.load_count(), 1);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_loads_once() {
        let loader = Arc::new(CountingLoader::default());
        let shared = Arc::new(SharedClassifier::new(ModelConfig::default(), loader.clone()));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let shared = Arc::clone(&shared);
            tasks.push(tokio::spawn(async move { shared.get().await.unwrap() }));
        }

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap());
        }

        assert!(handles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let loader = Arc::new(CountingLoader::default());
        loader.fail_first.store(true, Ordering::SeqCst);
        let shared = SharedClassifier::new(ModelConfig::default(), loader.clone());

        let err = shared.get().await.err().unwrap();
        assert!(matches!(err, authorcheck_core::Error::ModelLoad(_)));
        assert!(!shared.is_loaded());

        shared.get().await.unwrap();
        assert_eq!(shared.load_count(), 2);
    }
}
