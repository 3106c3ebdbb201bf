//! Candle/HuggingFace-backed RoBERTa sequence classifier.
//!
//! Resolves a model directory (local or Hub download), builds the
//! tokenizer, reads the label vocabulary and loads the weights into
//! `XLMRobertaForSequenceClassification`, which shares its layout with
//! plain RoBERTa checkpoints.

use crate::classifier::{ClassificationResult, Classifier};
use crate::loader_plugin::ModelLoader;
use crate::model_config::{ModelConfig, ModelSource};
use async_trait::async_trait;
use authorcheck_core::{Error, LabelScore, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};

const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Loads RoBERTa-family classifiers with Candle.
#[derive(Debug, Default, Clone, Copy)]
pub struct CandleModelLoader;

impl CandleModelLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelLoader for CandleModelLoader {
    async fn load_classifier(&self, config: &ModelConfig) -> Result<Box<dyn Classifier>> {
        let model_dir = resolve_model_dir(config).await?;
        let config = config.clone();

        let classifier = run_blocking("Model load", move || {
            RobertaSequenceClassifier::load(&config, &model_dir)
        })
        .await?;

        Ok(Box::new(classifier))
    }
}

async fn resolve_model_dir(config: &ModelConfig) -> Result<PathBuf> {
    match &config.source {
        ModelSource::Local { path } => {
            if !path.exists() {
                return Err(Error::model_load(format!(
                    "Model path does not exist: {}",
                    path.display()
                )));
            }
            Ok(path.clone())
        }
        ModelSource::HuggingFace { repo, revision } => {
            let repo = repo.clone();
            let revision = revision.clone();
            let cache_dir = config.resolved_cache_dir();
            run_blocking("Download", move || {
                download_from_huggingface(&repo, &revision, cache_dir)
            })
            .await
        }
    }
}

fn download_from_huggingface(repo: &str, revision: &str, cache_dir: PathBuf) -> Result<PathBuf> {
    tracing::info!(repo, revision, cache_dir = %cache_dir.display(), "Downloading model from HuggingFace");

    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_cache_dir(cache_dir)
        .build()
        .map_err(|e| {
            Error::model_load(format!("Failed to initialize HuggingFace API: {}", e))
        })?;

    let repo_obj = api.repo(hf_hub::Repo::with_revision(
        repo.to_string(),
        hf_hub::RepoType::Model,
        revision.to_string(),
    ));

    let config_path = repo_obj.get("config.json").map_err(|e| {
        Error::model_load(format!("Failed to download config.json from {}: {}", repo, e))
    })?;

    let mut found_weights = false;
    for weight_file in [SAFETENSORS_FILE, PYTORCH_FILE] {
        match repo_obj.get(weight_file) {
            Ok(_) => {
                tracing::debug!("Found weight file: {}", weight_file);
                found_weights = true;
                break;
            }
            Err(e) => tracing::debug!("Weight file {} unavailable: {}", weight_file, e),
        }
    }

    if !found_weights {
        return Err(Error::model_load(format!(
            "No model weights found in {} (tried {}, {})",
            repo, SAFETENSORS_FILE, PYTORCH_FILE
        )));
    }

    if repo_obj.get("tokenizer.json").is_err() {
        tracing::debug!("tokenizer.json unavailable, fetching BPE vocabulary");
        for file in ["vocab.json", "merges.txt"] {
            repo_obj.get(file).map_err(|e| {
                Error::model_load(format!("No tokenizer found in {}: {}: {}", repo, file, e))
            })?;
        }
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::model_load("Invalid cache path"))?;

    tracing::info!("Model available at: {}", model_dir.display());
    Ok(model_dir.to_path_buf())
}

/// RoBERTa sequence classifier producing a ranked label distribution.
///
/// Tokenization and the forward pass run on the blocking pool so a long
/// input does not stall the async workers.
pub struct RobertaSequenceClassifier {
    name: String,
    inner: Arc<RobertaInference>,
}

struct RobertaInference {
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
    labels: Vec<String>,
    max_length: usize,
}

impl RobertaSequenceClassifier {
    /// Load from a directory holding `config.json`, weights and tokenizer files
    pub fn load(config: &ModelConfig, model_dir: &Path) -> Result<Self> {
        let mut tokenizer = load_tokenizer(model_dir)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.inference.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::model_load(format!("Invalid truncation settings: {}", e)))?;
        let raw_config = read_json(&model_dir.join("config.json"))?;
        let roberta_config = parse_roberta_config(raw_config.clone())?;

        let num_labels = config.architecture.num_labels();
        let labels = resolve_labels(config.architecture.labels(), num_labels, &raw_config);

        let device = get_device(&config.inference.device)?;
        let vb = load_var_builder(model_dir, &device)?;
        let model = load_sequence_model(&vb, num_labels, &roberta_config)?;

        tracing::info!(
            "Successfully loaded {} with {} labels: {:?}",
            config.architecture.as_str(),
            num_labels,
            labels
        );

        Ok(Self {
            name: config.name.clone(),
            inner: Arc::new(RobertaInference {
                tokenizer,
                model,
                device,
                labels,
                max_length: config.inference.max_length,
            }),
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.inner.labels
    }
}

impl RobertaInference {
    fn input_tensor(&self, values: &[u32], what: &'static str) -> Result<Tensor> {
        Tensor::new(values, &self.device)
            .map_err(|e| Error::inference(format!("Failed to create {} tensor: {}", what, e)))?
            .unsqueeze(0)
            .map_err(|e| Error::inference(format!("Failed to unsqueeze {}: {}", what, e)))
    }

    /// Per-label probabilities in model output order
    fn scores(&self, text: &str) -> Result<Vec<LabelScore>> {
        // The tokenizer truncates to max_length, keeping <s> and </s>
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("Tokenization failed: {}", e)))?;
        if !encoding.get_overflowing().is_empty() {
            tracing::debug!(max_length = self.max_length, "Input truncated");
        }

        let input_ids = self.input_tensor(encoding.get_ids(), "input ids")?;
        let attention_mask = self.input_tensor(encoding.get_attention_mask(), "attention mask")?;
        let token_type_ids = self.input_tensor(encoding.get_type_ids(), "token type ids")?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))?;

        let probs = to_probabilities(&logits)?;
        Ok(label_scores(&self.labels, &probs))
    }
}

#[async_trait]
impl Classifier for RobertaSequenceClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        let scores = run_blocking("Inference", move || inner.scores(&text)).await?;

        let result = ClassificationResult::from_scores(scores)
            .ok_or_else(|| Error::inference("Model produced no scores"))?
            .with_model(self.name.clone())
            .with_latency_us(start.elapsed().as_micros() as u64);

        metrics::histogram!("authorcheck_inference_latency_us").record(result.latency_us as f64);
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Run CPU-bound or blocking work off the async workers
async fn run_blocking<T, F>(what: &'static str, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::internal(format!("{} task failed: {}", what, e)))?
}

fn get_device(device_str: &str) -> Result<Device> {
    match device_str.to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" | "cuda:0" => Device::new_cuda(0)
            .map_err(|e| Error::model_load(format!("Failed to initialize CUDA: {}", e))),
        "mps" | "metal" => Device::new_metal(0)
            .map_err(|e| Error::model_load(format!("Failed to initialize Metal: {}", e))),
        other => {
            tracing::warn!("Unknown device '{}', falling back to cpu", other);
            Ok(Device::Cpu)
        }
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::model_load(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        Error::model_load(format!("Failed to parse config {}: {}", path.display(), e))
    })
}

/// Older RoBERTa exports omit `position_embedding_type`; it is always
/// "absolute" for them.
fn parse_roberta_config(mut raw: serde_json::Value) -> Result<RobertaConfig> {
    if let Some(obj) = raw.as_object_mut() {
        obj.entry("position_embedding_type")
            .or_insert_with(|| serde_json::Value::String("absolute".to_string()));
    }

    serde_json::from_value(raw)
        .map_err(|e| Error::model_load(format!("Unsupported RoBERTa config: {}", e)))
}

/// Configured labels win; otherwise `id2label` from the checkpoint; gaps
/// become `label_<i>`.
fn resolve_labels(
    configured: &[String],
    num_labels: usize,
    model_config: &serde_json::Value,
) -> Vec<String> {
    let mut labels: Vec<String> = if configured.is_empty() {
        let id2label = model_config.get("id2label").and_then(|v| v.as_object());
        (0..num_labels)
            .map(|idx| {
                id2label
                    .and_then(|map| map.get(&idx.to_string()))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("label_{}", idx))
            })
            .collect()
    } else {
        configured.to_vec()
    };

    for idx in labels.len()..num_labels {
        labels.push(format!("label_{}", idx));
    }
    labels
}

fn load_var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join(SAFETENSORS_FILE);
    if safetensors.exists() {
        return unsafe {
            VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)
                .map_err(|e| Error::model_load(format!("Failed to load weights: {}", e)))
        };
    }

    let pytorch = model_dir.join(PYTORCH_FILE);
    if pytorch.exists() {
        tracing::debug!("Loading PyTorch weights from {}", pytorch.display());
        return VarBuilder::from_pth(&pytorch, DType::F32, device)
            .map_err(|e| Error::model_load(format!("Failed to load weights: {}", e)));
    }

    Err(Error::model_load(format!(
        "No {} or {} in {}",
        SAFETENSORS_FILE,
        PYTORCH_FILE,
        model_dir.display()
    )))
}

fn load_sequence_model(
    vb: &VarBuilder,
    num_labels: usize,
    config: &RobertaConfig,
) -> Result<XLMRobertaForSequenceClassification> {
    let mut errors = Vec::new();

    for prefix in ["", "model"] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };
        let effective_prefix = if prefix.is_empty() { "<root>" } else { prefix };

        match XLMRobertaForSequenceClassification::new(num_labels, config, vb_prefix) {
            Ok(model) => {
                tracing::info!("Loaded RoBERTa backbone from '{}'", effective_prefix);
                return Ok(model);
            }
            Err(e) => errors.push(format!("{}: {}", effective_prefix, e)),
        }
    }

    Err(Error::model_load(format!(
        "Failed to load RoBERTa sequence model with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

fn load_tokenizer(model_dir: &Path) -> Result<Tokenizer> {
    let tokenizer_json = model_dir.join("tokenizer.json");
    if tokenizer_json.exists() {
        tracing::debug!("Loading tokenizer from tokenizer.json");
        return Tokenizer::from_file(&tokenizer_json)
            .map_err(|e| Error::model_load(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab = model_dir.join("vocab.json");
    let merges = model_dir.join("merges.txt");
    if vocab.exists() && merges.exists() {
        tracing::debug!("Building byte-level BPE tokenizer from vocab.json/merges.txt");

        use tokenizers::models::bpe::BPE;
        use tokenizers::pre_tokenizers::byte_level::ByteLevel;
        use tokenizers::processors::roberta::RobertaProcessing;

        let bpe = BPE::from_file(
            vocab.to_string_lossy().as_ref(),
            merges.to_string_lossy().as_ref(),
        )
        .build()
        .map_err(|e| Error::model_load(format!("Failed to build BPE model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(bpe);
        let cls_id = tokenizer.token_to_id("<s>").unwrap_or(0);
        let sep_id = tokenizer.token_to_id("</s>").unwrap_or(2);

        tokenizer.with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(false)));
        tokenizer.with_post_processor(Some(RobertaProcessing::new(
            ("</s>".to_string(), sep_id),
            ("<s>".to_string(), cls_id),
        )));

        return Ok(tokenizer);
    }

    Err(Error::model_load(format!(
        "No tokenizer found in {} (tried tokenizer.json, vocab.json + merges.txt)",
        model_dir.display()
    )))
}

fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .map_err(|e| Error::inference(format!("Softmax failed: {}", e)))?
        .squeeze(0)
        .map_err(|e| Error::inference(format!("Squeeze failed: {}", e)))?
        .to_vec1()
        .map_err(|e| Error::inference(format!("Failed to convert to vec: {}", e)))
}

fn label_scores(labels: &[String], probs: &[f32]) -> Vec<LabelScore> {
    probs
        .iter()
        .enumerate()
        .map(|(idx, prob)| {
            let label = labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("label_{}", idx));
            LabelScore::new(label, *prob)
        })
        .collect()
}
