//! Classifier trait and common types

use async_trait::async_trait;
use authorcheck_core::types::rank_descending;
use authorcheck_core::{LabelScore, Result};
use serde::Serialize;

/// Trait for all classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// Highest-scoring label
    pub label: String,

    /// Confidence score of `label` (0.0-1.0)
    pub score: f32,

    /// Every label with its score, highest first
    pub ranked: Vec<LabelScore>,

    /// Model name or version
    pub model: Option<String>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a result with a single ranked entry
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        let label = label.into();
        Self {
            ranked: vec![LabelScore::new(label.clone(), score)],
            label,
            score,
            model: None,
            latency_us: 0,
        }
    }

    /// Build a result from unordered per-label scores.
    ///
    /// Returns `None` when `scores` is empty.
    pub fn from_scores(mut scores: Vec<LabelScore>) -> Option<Self> {
        rank_descending(&mut scores);
        let top = scores.first()?.clone();
        Some(Self {
            label: top.label,
            score: top.score,
            ranked: scores,
            model: None,
            latency_us: 0,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }
}
